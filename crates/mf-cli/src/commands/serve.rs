//! The long-running service: read API plus the scheduled daily sync

use crate::bootstrap;
use anyhow::{Context, Result};
use mf_core::Config;
use mf_loaders::SyncMode;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

pub async fn execute(config: Config) -> Result<()> {
  let runtime = bootstrap::build(&config, false).await?;

  let mut scheduler = start_scheduler(&config.sync_cron, Arc::clone(&runtime.runner)).await?;

  let router = mf_api::router(runtime.state);
  let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
    .await
    .with_context(|| format!("failed to bind port {}", config.port))?;

  info!("read API listening on port {}", config.port);
  axum::serve(listener, router).await.context("server terminated")?;

  scheduler.shutdown().await.ok();
  Ok(())
}

async fn start_scheduler(
  cron: &str,
  runner: Arc<mf_loaders::PipelineRunner>,
) -> Result<JobScheduler> {
  let scheduler = JobScheduler::new().await.context("failed to create scheduler")?;

  let schedule = with_seconds_field(cron);
  let job = Job::new_async_tz(schedule.as_str(), chrono_tz::Asia::Kolkata, move |_id, _lock| {
    let runner = Arc::clone(&runner);
    Box::pin(async move {
      info!("scheduled sync firing");
      if let Err(e) = runner.try_spawn(SyncMode::Incremental) {
        error!(error = %e, "scheduled sync not started");
      }
    })
  })
  .with_context(|| format!("invalid SYNC_CRON_SCHEDULE: {}", cron))?;

  scheduler.add(job).await.context("failed to register sync job")?;
  scheduler.start().await.context("failed to start scheduler")?;
  info!("daily sync scheduled at '{}' (Asia/Kolkata)", cron);

  Ok(scheduler)
}

/// The scheduler's cron dialect carries a seconds field; accept the
/// conventional five-field form from the environment.
fn with_seconds_field(cron: &str) -> String {
  match cron.split_whitespace().count() {
    5 => format!("0 {}", cron),
    _ => cron.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_five_field_cron_gains_seconds() {
    assert_eq!(with_seconds_field("0 6 * * *"), "0 0 6 * * *");
  }

  #[test]
  fn test_six_field_cron_unchanged() {
    assert_eq!(with_seconds_field("0 0 6 * * *"), "0 0 6 * * *");
  }
}
