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

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::{AnalyticsWindow, PipelinePhase, PipelineState, SyncStatus, SyncType};

/// Base URL for the public mutual-fund NAV API
pub const MFAPI_BASE_URL: &str = "https://api.mfapi.in/mf";

/// Default HTTP timeout for upstream requests, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default port for the read API
pub const DEFAULT_PORT: u16 = 3000;

/// Default cron schedule for the daily sync (Asia/Kolkata)
pub const DEFAULT_SYNC_CRON: &str = "0 6 * * *";

/// Namespace prefix for limiter keys in the key-value store
pub const RATE_LIMIT_KEY_PREFIX: &str = "ratelimit:mfapi";
