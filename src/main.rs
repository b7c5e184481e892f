// src/main.rs

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use vanguard_recon::logging::initialize_logging;
use vanguard_recon::{ReconConfig, ReconEngine};

const USAGE: &str = "usage: vanguard-recon <domain>";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    initialize_logging()?;

    let target = std::env::args().nth(1).ok_or_else(|| eyre!(USAGE))?;
    if target == "-h" || target == "--help" {
        println!("{USAGE}");
        return Ok(());
    }

    let config = ReconConfig::from_env().wrap_err("invalid configuration")?;
    info!(
        concurrency = config.probe_concurrency,
        timeout_secs = config.request_timeout.as_secs(),
        resolver = ?config.resolver,
        proxy = config.fetch_proxy.as_deref().unwrap_or("none"),
        "Configuration loaded."
    );

    let engine = ReconEngine::from_config(config)?;
    let report = engine.run(&target).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
