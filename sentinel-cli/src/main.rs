//! sentinel CLI: ingest messages and query the sentiment dashboard. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use sentinel_cli::{build_service, run, Cli, SentinelConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = SentinelConfig::from_env(cli.database_url.clone())?;

    sentinel_core::init_tracing(&config.log_file)?;

    let service = build_service(&config).await?;
    let result = run(cli.command, &service).await;
    service.store().close().await;
    result
}
