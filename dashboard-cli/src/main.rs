//! Binary crate for the `dashboard` tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the weather, currency and quote endpoints over HTTP
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dashboard_core=debug,dashboard=debug")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
