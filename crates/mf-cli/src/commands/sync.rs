//! One-shot pipeline run

use crate::bootstrap;
use anyhow::{anyhow, Result};
use mf_core::Config;
use mf_loaders::SyncMode;

pub async fn execute(config: Config, mode: &str) -> Result<()> {
  let mode: SyncMode =
    mode.parse().map_err(|_| anyhow!("invalid mode '{}'; expected full or incremental", mode))?;

  let runtime = bootstrap::build(&config, true).await?;
  let summary = runtime.runner.run(mode).await?;

  println!("{}", serde_json::to_string_pretty(&summary)?);
  Ok(())
}
