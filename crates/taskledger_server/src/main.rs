//! TaskLedger HTTP server entry point.

use taskledger_core::init_logging;
use taskledger_server::api;
use taskledger_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;
    api::serve(&config).await
}
