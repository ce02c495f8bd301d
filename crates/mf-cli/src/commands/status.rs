//! Print pipeline and per-scheme sync status

use crate::bootstrap;
use anyhow::Result;
use mf_core::{Config, SyncType};

pub async fn execute(config: Config) -> Result<()> {
  let runtime = bootstrap::build(&config, false).await?;
  let state = &runtime.state;

  let pipeline = state.pipeline.get().await?;
  println!(
    "pipeline: {} (phase: {}, progress: {:.1}%)",
    pipeline.status,
    pipeline.current_phase.as_deref().unwrap_or("-"),
    pipeline.progress_percent
  );
  println!(
    "schemes: {} total, {} completed, {} failed",
    pipeline.total_schemes, pipeline.completed_schemes, pipeline.failed_schemes
  );
  if let Some(last_error) = &pipeline.last_error {
    println!("last error: {}", last_error);
  }

  for sync_type in [SyncType::Backfill, SyncType::Incremental] {
    println!("\n{} sync states:", sync_type);
    let rows = state.sync_states.list_by_type(sync_type).await?;
    if rows.is_empty() {
      println!("  (none)");
    }
    for row in rows {
      println!(
        "  {:<12} {:<12} last={} records={}",
        row.scheme_code,
        row.status,
        row.last_synced_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        row.total_records.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
      );
    }
  }

  Ok(())
}
