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

//! Base traits and shared context for the pipeline loaders

use crate::discovery::SchemeFilter;
use crate::LoaderResult;
use async_trait::async_trait;
use mf_client::MfApiClient;
use mf_database_mysql::{
  AnalyticsRepository, FundRepository, NavRepository, PipelineStatusRepository,
  SyncStateRepository,
};
use std::sync::Arc;

/// Configuration for the pipeline loaders
#[derive(Debug, Clone)]
pub struct LoaderConfig {
  /// Scheme universe filter applied to the upstream catalog
  pub filter: SchemeFilter,

  /// Render an indicatif progress bar during per-scheme phases
  pub show_progress: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self { filter: SchemeFilter::default(), show_progress: false }
  }
}

/// Shared context handed to every loader
pub struct LoaderContext {
  pub client: Arc<MfApiClient>,
  pub funds: Arc<FundRepository>,
  pub navs: Arc<NavRepository>,
  pub analytics: Arc<AnalyticsRepository>,
  pub sync_states: Arc<SyncStateRepository>,
  pub pipeline: Arc<PipelineStatusRepository>,
  pub config: LoaderConfig,
}

/// Base trait for all pipeline loaders
#[async_trait]
pub trait DataLoader: Send + Sync {
  /// The type of input this loader processes
  type Input;

  /// The result type after loading
  type Output;

  /// Run the loader against the shared context
  async fn load(&self, context: &LoaderContext, input: Self::Input) -> LoaderResult<Self::Output>;

  /// Loader name for logging/tracking
  fn name(&self) -> &'static str;
}

/// Progress-percent range a phase occupies within a pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpan {
  pub start: f64,
  pub end: f64,
}

impl PhaseSpan {
  pub fn new(start: f64, end: f64) -> Self {
    Self { start, end }
  }

  /// Linear interpolation of `done / total` into the span
  pub fn at(&self, done: usize, total: usize) -> f64 {
    if total == 0 {
      return self.end;
    }
    self.start + (self.end - self.start) * done as f64 / total as f64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_phase_span_interpolates() {
    let span = PhaseSpan::new(10.0, 70.0);
    assert_eq!(span.at(0, 10), 10.0);
    assert_eq!(span.at(5, 10), 40.0);
    assert_eq!(span.at(10, 10), 70.0);
  }

  #[test]
  fn test_phase_span_empty_total_jumps_to_end() {
    let span = PhaseSpan::new(10.0, 70.0);
    assert_eq!(span.at(0, 0), 70.0);
  }
}
