//! Per-scheme analytics recompute
//!
//! Reads each scheme's full NAV history after ingestion settles and
//! replaces its analytics rows. Windows without enough history produce no
//! row; stale rows for such windows are removed.

use crate::loader::{DataLoader, LoaderContext, PhaseSpan};
use crate::LoaderResult;
use async_trait::async_trait;
use bigdecimal::ToPrimitive;
use chrono::Utc;
use mf_analytics::{compute_window, NavSeries, WindowMetrics};
use mf_core::{AnalyticsWindow, PipelinePhase};
use mf_database_mysql::NewFundAnalytics;
use tracing::{debug, info};

pub struct AnalyticsInput {
  pub scheme_codes: Vec<String>,
  pub span: PhaseSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalyticsOutput {
  /// Analytics rows written across all schemes
  pub rows_written: usize,

  /// Schemes processed (including those with no sufficient window)
  pub schemes_processed: usize,
}

#[derive(Default)]
pub struct AnalyticsLoader;

impl AnalyticsLoader {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DataLoader for AnalyticsLoader {
  type Input = AnalyticsInput;
  type Output = AnalyticsOutput;

  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output> {
    let total = input.scheme_codes.len();
    let mut output = AnalyticsOutput::default();

    for (index, scheme_code) in input.scheme_codes.iter().enumerate() {
      let rows = context.navs.series(scheme_code).await?;
      let series = NavSeries::new(
        rows
          .iter()
          .filter_map(|row| row.nav.to_f64().map(|nav| (row.nav_date, nav)))
          .collect(),
      );

      let computed_at = Utc::now().naive_utc();
      let new_rows: Vec<NewFundAnalytics> = AnalyticsWindow::ALL
        .iter()
        .filter_map(|&window| compute_window(&series, window))
        .map(|metrics| to_row(scheme_code, &metrics, computed_at))
        .collect();

      if new_rows.is_empty() {
        debug!(scheme_code = %scheme_code, "insufficient history for every window");
      }

      output.rows_written += context.analytics.replace_for_scheme(scheme_code, &new_rows).await?;
      output.schemes_processed += 1;

      context
        .pipeline
        .update_progress(
          PipelinePhase::Analytics,
          input.span.at(index + 1, total),
          output.schemes_processed as i32,
          0,
        )
        .await?;
    }

    info!(
      schemes = output.schemes_processed,
      rows = output.rows_written,
      "analytics recompute finished"
    );
    Ok(output)
  }

  fn name(&self) -> &'static str {
    "analytics"
  }
}

fn to_row(
  scheme_code: &str,
  metrics: &WindowMetrics,
  computed_at: chrono::NaiveDateTime,
) -> NewFundAnalytics {
  NewFundAnalytics {
    scheme_code: scheme_code.to_string(),
    window_type: metrics.window.as_str().to_string(),
    rolling_return_min: metrics.rolling_returns.map(|r| r.min),
    rolling_return_max: metrics.rolling_returns.map(|r| r.max),
    rolling_return_median: metrics.rolling_returns.map(|r| r.median),
    rolling_return_p25: metrics.rolling_returns.map(|r| r.p25),
    rolling_return_p75: metrics.rolling_returns.map(|r| r.p75),
    max_drawdown: Some(metrics.max_drawdown),
    cagr_min: metrics.cagr.map(|c| c.min),
    cagr_max: metrics.cagr.map(|c| c.max),
    cagr_median: metrics.cagr.map(|c| c.median),
    data_start_date: metrics.data_start_date,
    data_end_date: metrics.data_end_date,
    computed_at,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Days, NaiveDate};

  #[test]
  fn test_to_row_maps_every_metric() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let series = NavSeries::new(
      (0..=400u64)
        .map(|i| (start.checked_add_days(Days::new(i)).unwrap(), 100.0 + i as f64 * 0.1))
        .collect(),
    );
    let metrics = compute_window(&series, AnalyticsWindow::OneYear).unwrap();
    let row = to_row("119551", &metrics, Utc::now().naive_utc());

    assert_eq!(row.window_type, "1Y");
    assert!(row.rolling_return_median.is_some());
    assert!(row.cagr_median.is_some());
    assert_eq!(row.max_drawdown, Some(0.0));
    assert_eq!(row.data_start_date, start);
  }
}
