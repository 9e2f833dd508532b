mod cli;

use anyhow::Context;
use clap::Parser;

use stacks_tx_explainer::api::{self, AppState};
use stacks_tx_explainer::config::Config;
use stacks_tx_explainer::hiro::HiroClient;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let hiro = HiroClient::new(&config)?;

    match cli.command {
        Commands::Serve { addr } => {
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            api::run_http_server(&bind, AppState { hiro }).await?;
        }
        Commands::Explain { txid, debug } => {
            let response = api::explain_txid(&hiro, &txid, debug)
                .await
                .with_context(|| format!("failed to explain {}", txid))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
