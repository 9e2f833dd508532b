use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stacks-tx-explainer", version, about = "Explain Stacks transactions in plain words")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API and web UI
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
    },
    /// Fetch one transaction and print its explanation as JSON
    Explain {
        /// Transaction id, 64 hex characters with or without 0x
        txid: String,
        /// Include the raw indexer response
        #[arg(long)]
        debug: bool,
    },
}
