use std::fmt;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::resolve::{self, Path};

const TIP_HEIGHT: &[Path] = &[&["stacks_tip_height"]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("transaction {0} was not found on mainnet or testnet")]
    NotFound(String),
    #[error("{network} API returned HTTP {status}")]
    Upstream { network: Network, status: u16 },
    #[error("request to {network} API failed: {source}")]
    Transport {
        network: Network,
        #[source]
        source: reqwest::Error,
    },
    #[error("{network} API returned an unreadable body: {reason}")]
    InvalidBody { network: Network, reason: String },
}

/// A transaction as returned by the indexer, with the network it was found on.
#[derive(Debug, Clone)]
pub struct FetchedTransaction {
    pub network: Network,
    pub tx: Value,
    pub events: Vec<Value>,
}

/// Client for the Hiro Stacks API. Lookups try each network in order.
#[derive(Clone)]
pub struct HiroClient {
    http: reqwest::Client,
    endpoints: Vec<(Network, Url)>,
}

impl HiroClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(config.http_timeout)
            .user_agent(concat!("stacks-tx-explainer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self {
            http,
            endpoints: vec![
                (Network::Mainnet, config.mainnet_api_url.clone()),
                (Network::Testnet, config.testnet_api_url.clone()),
            ],
        })
    }

    /// Looks the transaction up on mainnet, then testnet. Only a 404 moves
    /// on to the next network; any other failure is returned immediately.
    pub async fn fetch_transaction(&self, txid: &str) -> Result<FetchedTransaction, FetchError> {
        for (network, base) in &self.endpoints {
            let network = *network;
            let url = endpoint(base, &format!("extended/v1/tx/{}", txid));
            tracing::debug!(%network, %url, "fetching transaction");

            let res = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|source| FetchError::Transport { network, source })?;

            if res.status() == StatusCode::NOT_FOUND {
                tracing::info!(%network, txid, "transaction not found, trying next network");
                continue;
            }
            if !res.status().is_success() {
                return Err(FetchError::Upstream {
                    network,
                    status: res.status().as_u16(),
                });
            }

            let mut tx: Value = res.json().await.map_err(|e| FetchError::InvalidBody {
                network,
                reason: e.to_string(),
            })?;
            if !tx.is_object() {
                return Err(FetchError::InvalidBody {
                    network,
                    reason: "expected a JSON object".to_string(),
                });
            }

            let events = match tx.as_object_mut().and_then(|obj| obj.remove("events")) {
                Some(Value::Array(events)) => events,
                _ => Vec::new(),
            };
            return Ok(FetchedTransaction {
                network,
                tx,
                events,
            });
        }

        Err(FetchError::NotFound(txid.to_string()))
    }

    /// Current chain tip height for `network`. Failures are logged and
    /// reported as `None`, since the tip only feeds the confirmation count.
    pub async fn fetch_tip_height(&self, network: Network) -> Option<u64> {
        let (_, base) = self.endpoints.iter().find(|(n, _)| *n == network)?;
        let url = endpoint(base, "v2/info");

        let info: Value = match self.http.get(&url).send().await {
            Ok(res) if res.status().is_success() => match res.json().await {
                Ok(info) => info,
                Err(e) => {
                    tracing::warn!(%network, "failed to read chain info: {}", e);
                    return None;
                }
            },
            Ok(res) => {
                tracing::warn!(%network, status = %res.status(), "chain info request rejected");
                return None;
            }
            Err(e) => {
                tracing::warn!(%network, "failed to fetch chain info: {}", e);
                return None;
            }
        };

        resolve::resolve_u64(&info, TIP_HEIGHT)
    }
}

fn endpoint(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

/// Accepts a 64-hex-character transaction id with or without `0x` and
/// returns it lowercased with the prefix.
pub fn normalize_txid(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{}", hex.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "6D5C9A4E2B1F8A7C3D0E9B8A7F6C5D4E3B2A1908F7E6D5C4B3A2918076F5E4D3";

    #[test]
    fn txid_with_or_without_prefix() {
        let expected = format!("0x{}", TXID.to_ascii_lowercase());
        assert_eq!(normalize_txid(TXID), Some(expected.clone()));
        assert_eq!(normalize_txid(&format!("0x{}", TXID)), Some(expected.clone()));
        assert_eq!(normalize_txid(&format!("  0X{}\n", TXID)), Some(expected));
    }

    #[test]
    fn txid_rejects_bad_input() {
        assert_eq!(normalize_txid(""), None);
        assert_eq!(normalize_txid("0x1234"), None);
        assert_eq!(normalize_txid(&TXID.replace('D', "Z")), None);
        assert_eq!(normalize_txid(&format!("{}00", TXID)), None);
    }

    #[test]
    fn endpoint_handles_trailing_slash_and_prefix() {
        let base = Url::parse("https://api.hiro.so").unwrap();
        assert_eq!(endpoint(&base, "v2/info"), "https://api.hiro.so/v2/info");

        let base = Url::parse("http://localhost:3999/proxy/").unwrap();
        assert_eq!(
            endpoint(&base, "extended/v1/tx/0xab"),
            "http://localhost:3999/proxy/extended/v1/tx/0xab"
        );
    }
}
