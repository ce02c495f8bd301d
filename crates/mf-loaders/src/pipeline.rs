/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Pipeline orchestration
//!
//! One run at a time, process-wide. The in-process flag settles same-process
//! races; the durable pipeline-status row settles cross-restart ambiguity
//! and is what the control plane reports.

use crate::analytics_loader::{AnalyticsInput, AnalyticsLoader};
use crate::backfill_loader::{BackfillInput, BackfillLoader};
use crate::incremental_loader::{IncrementalInput, IncrementalLoader};
use crate::loader::{DataLoader, LoaderContext, PhaseSpan};
use crate::{LoaderError, LoaderResult};
use mf_core::{PipelinePhase, SyncType};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Which pipeline variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
  Full,
  Incremental,
}

impl fmt::Display for SyncMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SyncMode::Full => write!(f, "full"),
      SyncMode::Incremental => write!(f, "incremental"),
    }
  }
}

impl FromStr for SyncMode {
  type Err = LoaderError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "full" => Ok(SyncMode::Full),
      "incremental" => Ok(SyncMode::Incremental),
      other => Err(LoaderError::InvalidData(format!("unknown sync mode: {}", other))),
    }
  }
}

/// Counters reported after a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineRunSummary {
  pub mode: SyncMode,
  pub total_schemes: usize,
  pub completed: usize,
  pub failed: usize,
  pub skipped: usize,
  pub nav_rows_written: usize,
  pub analytics_rows_written: usize,
}

pub struct PipelineRunner {
  context: Arc<LoaderContext>,
  running: AtomicBool,
}

/// Releases the in-process pipeline slot when a run ends, however it ends
struct SlotGuard<'a>(&'a AtomicBool);

impl Drop for SlotGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::SeqCst);
  }
}

impl PipelineRunner {
  pub fn new(context: Arc<LoaderContext>) -> Self {
    Self { context, running: AtomicBool::new(false) }
  }

  pub fn context(&self) -> &Arc<LoaderContext> {
    &self.context
  }

  /// Whether a run currently holds the slot in this process
  pub fn is_running(&self) -> bool {
    self.running.load(Ordering::SeqCst)
  }

  /// Startup recovery: seed the status row and clear an interrupted run
  ///
  /// A process kill leaves the durable row `running`; per-scheme resume is
  /// handled by sync-state status once a new run is triggered.
  pub async fn startup_recovery(&self) -> LoaderResult<()> {
    self.context.pipeline.ensure_row().await?;
    self.context.pipeline.reset_if_interrupted().await?;
    Ok(())
  }

  /// Execute a pipeline run, holding the process-wide slot
  ///
  /// Returns [`LoaderError::AlreadyRunning`] when another run holds it.
  pub async fn run(&self, mode: SyncMode) -> LoaderResult<PipelineRunSummary> {
    if self.running.swap(true, Ordering::SeqCst) {
      return Err(LoaderError::AlreadyRunning);
    }
    self.execute_holding_slot(mode).await
  }

  /// Claim the slot now, run in the background
  ///
  /// The conflict answer is exact: the slot is taken before this returns,
  /// so a second trigger observes it immediately.
  pub fn try_spawn(self: &Arc<Self>, mode: SyncMode) -> LoaderResult<()> {
    if self.running.swap(true, Ordering::SeqCst) {
      return Err(LoaderError::AlreadyRunning);
    }
    let runner = Arc::clone(self);
    tokio::spawn(async move {
      // Outcome is recorded in the durable status row either way.
      let _ = runner.execute_holding_slot(mode).await;
    });
    Ok(())
  }

  async fn execute_holding_slot(&self, mode: SyncMode) -> LoaderResult<PipelineRunSummary> {
    let _slot = SlotGuard(&self.running);

    info!(%mode, "pipeline run starting");
    let result = match mode {
      SyncMode::Full => self.run_full().await,
      SyncMode::Incremental => self.run_incremental().await,
    };

    match &result {
      Ok(summary) => {
        info!(?summary, "pipeline run finished");
      }
      Err(e) => {
        error!(error = %e, "pipeline run failed");
        // Best effort: the original error is what the caller needs to see.
        if let Err(status_err) = self.context.pipeline.fail(&e.to_string()).await {
          error!(error = %status_err, "failed to record pipeline failure");
        }
      }
    }

    result
  }

  /// discovery (0-10%) -> backfill (10-70%) -> analytics (70-100%)
  async fn run_full(&self) -> LoaderResult<PipelineRunSummary> {
    let context = &self.context;
    context.pipeline.begin_run(PipelinePhase::Discovery).await?;

    let catalog = context.client.list_schemes().await?;
    let schemes = context.config.filter.filter(&catalog);
    info!(catalog = catalog.len(), selected = schemes.len(), "discovery finished");

    context.pipeline.set_total_schemes(schemes.len() as i32).await?;
    context.pipeline.update_progress(PipelinePhase::Discovery, 10.0, 0, 0).await?;

    let total = schemes.len();
    let backfill = BackfillLoader::new()
      .load(context, BackfillInput { schemes, span: PhaseSpan::new(10.0, 70.0) })
      .await?;

    let codes = context.funds.scheme_codes().await?;
    let analytics = AnalyticsLoader::new()
      .load(context, AnalyticsInput { scheme_codes: codes, span: PhaseSpan::new(70.0, 100.0) })
      .await?;

    context.pipeline.complete().await?;

    Ok(PipelineRunSummary {
      mode: SyncMode::Full,
      total_schemes: total,
      completed: backfill.completed,
      failed: backfill.failed,
      skipped: backfill.skipped,
      nav_rows_written: backfill.records_written,
      analytics_rows_written: analytics.rows_written,
    })
  }

  /// incremental (0-70%) -> analytics (70-100%), analytics skipped when the
  /// delta brought no new rows
  async fn run_incremental(&self) -> LoaderResult<PipelineRunSummary> {
    let context = &self.context;
    context.pipeline.begin_run(PipelinePhase::Incremental).await?;

    let codes = context.sync_states.completed_scheme_codes(SyncType::Backfill).await?;
    context.pipeline.set_total_schemes(codes.len() as i32).await?;

    let total = codes.len();
    let incremental = IncrementalLoader::new()
      .load(
        context,
        IncrementalInput { scheme_codes: codes.clone(), span: PhaseSpan::new(0.0, 70.0) },
      )
      .await?;

    let analytics_rows = if incremental.new_rows > 0 {
      let analytics = AnalyticsLoader::new()
        .load(context, AnalyticsInput { scheme_codes: codes, span: PhaseSpan::new(70.0, 100.0) })
        .await?;
      analytics.rows_written
    } else {
      info!("no new NAV rows; skipping analytics recompute");
      0
    };

    context.pipeline.complete().await?;

    Ok(PipelineRunSummary {
      mode: SyncMode::Incremental,
      total_schemes: total,
      completed: incremental.synced,
      failed: incremental.failed,
      skipped: 0,
      nav_rows_written: incremental.new_rows,
      analytics_rows_written: analytics_rows,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sync_mode_parsing() {
    assert_eq!("full".parse::<SyncMode>().unwrap(), SyncMode::Full);
    assert_eq!("incremental".parse::<SyncMode>().unwrap(), SyncMode::Incremental);
    assert!("delta".parse::<SyncMode>().is_err());
  }

  #[test]
  fn test_sync_mode_display() {
    assert_eq!(SyncMode::Full.to_string(), "full");
    assert_eq!(SyncMode::Incremental.to_string(), "incremental");
  }
}
