use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_MAINNET_URL: &str = "https://api.hiro.so";
pub const DEFAULT_TESTNET_URL: &str = "https://api.testnet.hiro.so";

#[derive(Debug, Clone)]
pub struct Config {
    pub mainnet_api_url: Url,
    pub testnet_api_url: Url,
    pub http_bind_addr: String,
    pub http_timeout: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid HTTP_TIMEOUT_SECS: {0:?}")]
    InvalidTimeout(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mainnet_api_url = parse_url(
            "HIRO_MAINNET_URL",
            env::var("HIRO_MAINNET_URL").ok(),
            DEFAULT_MAINNET_URL,
        )?;
        let testnet_api_url = parse_url(
            "HIRO_TESTNET_URL",
            env::var("HIRO_TESTNET_URL").ok(),
            DEFAULT_TESTNET_URL,
        )?;
        let http_bind_addr = env::var("HTTP_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let http_timeout = parse_timeout(env::var("HTTP_TIMEOUT_SECS").ok())?;

        Ok(Self {
            mainnet_api_url,
            testnet_api_url,
            http_bind_addr,
            http_timeout,
        })
    }
}

fn parse_url(var: &'static str, raw: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let raw = raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var, source })
}

fn parse_timeout(raw: Option<String>) -> Result<Duration, ConfigError> {
    match raw {
        None => Ok(Duration::from_secs(10)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or(ConfigError::InvalidTimeout(raw)),
    }
}
