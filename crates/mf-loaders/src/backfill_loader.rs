//! Full-history backfill, one scheme at a time
//!
//! Restart-safe: completed schemes are skipped, everything else is
//! reprocessed from scratch against the idempotent NAV upsert.

use crate::discovery::SchemeDescriptor;
use crate::loader::{DataLoader, LoaderContext, PhaseSpan};
use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use mf_core::{PipelinePhase, SyncStatus, SyncType};
use mf_database_mysql::{FundUpsert, NewNavPoint, SyncState};
use tracing::{info, warn};

pub struct BackfillInput {
  pub schemes: Vec<SchemeDescriptor>,
  pub span: PhaseSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BackfillOutput {
  pub completed: usize,
  pub skipped: usize,
  pub failed: usize,
  pub records_written: usize,
}

/// Whether a scheme still needs backfilling
///
/// Only a completed row skips; pending, failed, and interrupted in_progress
/// schemes all reprocess from scratch.
pub fn needs_backfill(state: Option<&SyncState>) -> bool {
  match state {
    Some(state) => state.status != SyncStatus::Completed.as_str(),
    None => true,
  }
}

#[derive(Default)]
pub struct BackfillLoader;

impl BackfillLoader {
  pub fn new() -> Self {
    Self
  }

  /// Fetch and persist the full history of one scheme
  ///
  /// Returns the latest NAV date and the record count.
  async fn sync_scheme(
    &self,
    context: &LoaderContext,
    scheme: &SchemeDescriptor,
  ) -> LoaderResult<(Option<NaiveDate>, usize)> {
    let history = context.client.fetch_scheme(&scheme.scheme_code).await?;

    // Upstream metadata is authoritative for name and type; the category
    // label stays with the discovery taxonomy.
    context
      .funds
      .upsert(&FundUpsert {
        scheme_code: scheme.scheme_code.clone(),
        scheme_name: history.meta.scheme_name.clone(),
        amc: scheme.amc.clone(),
        category: scheme.category.clone(),
        scheme_type: history.meta.scheme_type.clone(),
      })
      .await?;

    let records: Vec<NewNavPoint> = history
      .nav_history
      .iter()
      .map(|point| NewNavPoint {
        scheme_code: scheme.scheme_code.clone(),
        nav_date: point.date,
        nav: point.nav.clone(),
      })
      .collect();

    let written = context.navs.bulk_upsert(&records).await?;
    let last_date = history.nav_history.last().map(|point| point.date);

    Ok((last_date, written))
  }
}

#[async_trait]
impl DataLoader for BackfillLoader {
  type Input = BackfillInput;
  type Output = BackfillOutput;

  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    let total = input.schemes.len();
    let mut output = BackfillOutput::default();

    let bar = progress_bar(context, total, "backfill");

    for (index, scheme) in input.schemes.iter().enumerate() {
      // The fund row must exist before its sync-state row (FK) and before
      // any NAV write. Known funds keep their upstream metadata; the stub is
      // only for first appearance, ahead of the history fetch.
      if context.funds.get(&scheme.scheme_code).await?.is_none() {
        context
          .funds
          .upsert(&FundUpsert {
            scheme_code: scheme.scheme_code.clone(),
            scheme_name: scheme.scheme_name.clone(),
            amc: scheme.amc.clone(),
            category: scheme.category.clone(),
            scheme_type: String::new(),
          })
          .await?;
      }
      context.sync_states.ensure(&scheme.scheme_code, SyncType::Backfill).await?;

      let state = context.sync_states.get(&scheme.scheme_code, SyncType::Backfill).await?;
      if !needs_backfill(state.as_ref()) {
        info!(scheme_code = %scheme.scheme_code, "backfill already completed, skipping");
        output.skipped += 1;
      } else {
        context.sync_states.mark_in_progress(&scheme.scheme_code, SyncType::Backfill).await?;

        match self.sync_scheme(context, scheme).await {
          Ok((last_date, written)) => {
            context
              .sync_states
              .mark_completed(
                &scheme.scheme_code,
                SyncType::Backfill,
                last_date,
                written as i32,
              )
              .await?;
            info!(scheme_code = %scheme.scheme_code, records = written, "backfill completed");
            output.completed += 1;
            output.records_written += written;
          }
          Err(LoaderError::RateLimitBreach(message)) => {
            // A 429 means the limiter drifted; abort the whole run.
            context
              .sync_states
              .mark_failed(&scheme.scheme_code, SyncType::Backfill, &message)
              .await?;
            return Err(LoaderError::RateLimitBreach(message));
          }
          Err(e) => {
            warn!(scheme_code = %scheme.scheme_code, error = %e, "backfill failed");
            context
              .sync_states
              .mark_failed(&scheme.scheme_code, SyncType::Backfill, &e.to_string())
              .await?;
            output.failed += 1;
          }
        }
      }

      if let Some(bar) = &bar {
        bar.inc(1);
      }
      context
        .pipeline
        .update_progress(
          PipelinePhase::Backfill,
          input.span.at(index + 1, total),
          output.completed as i32,
          output.failed as i32,
        )
        .await?;
    }

    if let Some(bar) = &bar {
      bar.finish_with_message("backfill done");
    }

    Ok(output)
  }

  fn name(&self) -> &'static str {
    "backfill"
  }
}

fn progress_bar(context: &LoaderContext, total: usize, phase: &str) -> Option<ProgressBar> {
  if !context.config.show_progress {
    return None;
  }
  let bar = ProgressBar::new(total as u64);
  bar.set_style(
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
      .unwrap_or_else(|_| ProgressStyle::default_bar()),
  );
  bar.set_message(phase.to_string());
  Some(bar)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn state(status: SyncStatus) -> SyncState {
    SyncState {
      scheme_code: "119551".to_string(),
      sync_type: SyncType::Backfill.to_string(),
      status: status.to_string(),
      last_synced_date: None,
      total_records: None,
      error_message: None,
      started_at: None,
      completed_at: None,
      updated_at: Utc::now().naive_utc(),
    }
  }

  #[test]
  fn test_completed_scheme_is_skipped() {
    assert!(!needs_backfill(Some(&state(SyncStatus::Completed))));
  }

  #[test]
  fn test_resume_reprocesses_everything_else() {
    assert!(needs_backfill(None));
    assert!(needs_backfill(Some(&state(SyncStatus::Pending))));
    assert!(needs_backfill(Some(&state(SyncStatus::Failed))));
    assert!(needs_backfill(Some(&state(SyncStatus::InProgress))));
  }

  #[test]
  fn test_resume_selection_counts() {
    // Three schemes with [completed, failed, pending] states: exactly two
    // are reprocessed.
    let states =
      [Some(state(SyncStatus::Completed)), Some(state(SyncStatus::Failed)), None];
    let to_process = states.iter().filter(|s| needs_backfill(s.as_ref())).count();
    assert_eq!(to_process, 2);
  }
}
