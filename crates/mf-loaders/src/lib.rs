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

//! # mf-loaders
//!
//! The ingestion pipeline: catalog discovery, per-scheme backfill with
//! resume-on-restart, incremental delta sync, and the analytics recompute,
//! sequenced by a single-slot pipeline runner.
//!
//! Schemes are processed sequentially by design. The upstream allows 300
//! requests an hour; with a universe of tens of schemes, parallel fetches
//! would only complicate limiter accounting without adding throughput.

pub mod analytics_loader;
pub mod backfill_loader;
pub mod discovery;
pub mod error;
pub mod incremental_loader;
pub mod loader;
pub mod pipeline;

pub use analytics_loader::{AnalyticsInput, AnalyticsLoader, AnalyticsOutput};
pub use backfill_loader::{needs_backfill, BackfillInput, BackfillLoader, BackfillOutput};
pub use discovery::{SchemeDescriptor, SchemeFilter};
pub use error::{LoaderError, LoaderResult};
pub use incremental_loader::{IncrementalInput, IncrementalLoader, IncrementalOutput};
pub use loader::{DataLoader, LoaderConfig, LoaderContext, PhaseSpan};
pub use pipeline::{PipelineRunSummary, PipelineRunner, SyncMode};
