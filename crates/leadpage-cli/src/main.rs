//! Leadpage CLI

use anyhow::Result;
use clap::Parser;
use leadpage_cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,leadpage=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    leadpage_cli::run(cli).await?;
    Ok(())
}
