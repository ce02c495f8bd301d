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

//! # mf-limiter
//!
//! Token-bucket rate limiting shared across workers through a key-value
//! store. Three buckets (per-second, per-minute, per-hour) guard every
//! upstream request; a request is admitted only when all three yield a token.
//!
//! Bucket state lives in the store as a `{tokens, last_refill}` hash with a
//! two-hour TTL refreshed on every touch, so limiter accounting survives
//! process crashes and is honored by concurrent workers. The
//! read-refill-consume-write step executes atomically inside the store
//! (a server-side script for the Redis backends, a mutex for the in-memory
//! test backend).
//!
//! If the store is unreachable during an acquire, the limiter fails open:
//! the request is admitted and a `warn!` event is emitted. A store that is
//! down should stall ingestion observably, not permanently.

pub mod bucket;
pub mod error;
pub mod limiter;
pub mod memory;
pub mod redis_store;
pub mod upstash;

pub use bucket::{BucketState, ConsumeReply, LIMITER_KEY_TTL_SECS};
pub use error::{Error, Result};
pub use limiter::{AcquireDecision, BucketStatus, RateLimiter, DEFAULT_ACQUIRE_TIMEOUT};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use upstash::UpstashStore;

use async_trait::async_trait;
use mf_core::config::BucketSettings;

/// Storage backend capability set for limiter buckets
///
/// `consume` must perform the whole read-refill-consume-write sequence as a
/// single atomic step; `peek` reads without consuming.
#[async_trait]
pub trait BucketStore: Send + Sync {
    async fn consume(
        &self,
        key: &str,
        settings: &BucketSettings,
        now_ms: i64,
    ) -> Result<ConsumeReply>;

    async fn peek(&self, key: &str) -> Result<Option<BucketState>>;
}
