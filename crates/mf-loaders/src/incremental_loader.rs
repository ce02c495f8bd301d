//! Incremental delta sync for schemes with a completed backfill
//!
//! Fetches the upstream history, keeps only dates strictly newer than the
//! latest persisted NAV, and upserts those. Even a full-history response is
//! safe: the filter plus the idempotent write make reprocessing a no-op.

use crate::loader::{DataLoader, LoaderContext, PhaseSpan};
use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use mf_core::{PipelinePhase, SyncType};
use mf_database_mysql::NewNavPoint;
use tracing::{info, warn};

pub struct IncrementalInput {
  /// Scheme codes whose backfill sync-state is completed
  pub scheme_codes: Vec<String>,
  pub span: PhaseSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IncrementalOutput {
  pub synced: usize,
  pub failed: usize,
  pub new_rows: usize,
}

#[derive(Default)]
pub struct IncrementalLoader;

impl IncrementalLoader {
  pub fn new() -> Self {
    Self
  }

  async fn sync_scheme(
    &self,
    context: &LoaderContext,
    scheme_code: &str,
  ) -> LoaderResult<(Option<NaiveDate>, usize)> {
    let since = context.navs.max_date(scheme_code).await?;
    let history = context.client.fetch_scheme(scheme_code).await?;

    let records: Vec<NewNavPoint> = history
      .nav_history
      .iter()
      .filter(|point| since.is_none_or(|since| point.date > since))
      .map(|point| NewNavPoint {
        scheme_code: scheme_code.to_string(),
        nav_date: point.date,
        nav: point.nav.clone(),
      })
      .collect();

    let written = context.navs.bulk_upsert(&records).await?;
    let last_date = history.nav_history.last().map(|point| point.date).or(since);

    Ok((last_date, written))
  }
}

#[async_trait]
impl DataLoader for IncrementalLoader {
  type Input = IncrementalInput;
  type Output = IncrementalOutput;

  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    let total = input.scheme_codes.len();
    let mut output = IncrementalOutput::default();

    for (index, scheme_code) in input.scheme_codes.iter().enumerate() {
      context.sync_states.ensure(scheme_code, SyncType::Incremental).await?;
      context.sync_states.mark_in_progress(scheme_code, SyncType::Incremental).await?;

      match self.sync_scheme(context, scheme_code).await {
        Ok((last_date, written)) => {
          context
            .sync_states
            .mark_completed(scheme_code, SyncType::Incremental, last_date, written as i32)
            .await?;
          info!(scheme_code = %scheme_code, new_rows = written, "incremental sync completed");
          output.synced += 1;
          output.new_rows += written;
        }
        Err(LoaderError::RateLimitBreach(message)) => {
          context
            .sync_states
            .mark_failed(scheme_code, SyncType::Incremental, &message)
            .await?;
          return Err(LoaderError::RateLimitBreach(message));
        }
        Err(e) => {
          warn!(scheme_code = %scheme_code, error = %e, "incremental sync failed");
          context
            .sync_states
            .mark_failed(scheme_code, SyncType::Incremental, &e.to_string())
            .await?;
          output.failed += 1;
        }
      }

      context
        .pipeline
        .update_progress(
          PipelinePhase::Incremental,
          input.span.at(index + 1, total),
          output.synced as i32,
          output.failed as i32,
        )
        .await?;
    }

    Ok(output)
  }

  fn name(&self) -> &'static str {
    "incremental"
  }
}
