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

//! Three-bucket admission control
//!
//! Every upstream request must win a token from the per-second, per-minute,
//! and per-hour buckets. The checks run sequentially, most restrictive
//! first. A denial after an earlier bucket already yielded its token is not
//! rolled back; the prematurely drained bucket simply refills on its own
//! schedule and overall admission stays bounded by the strictest bucket.

use crate::bucket::BucketState;
use crate::{BucketStore, Error, Result};
use mf_core::config::{BucketSettings, RateLimitSettings};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Default deadline for `wait_for_token`
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(300);

/// Upper bound on the jitter added to each retry sleep
const RETRY_JITTER_MS: u64 = 50;

struct Bucket {
    name: &'static str,
    key: String,
    settings: BucketSettings,
}

/// Outcome of one `acquire` across all three buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquireDecision {
    pub allowed: bool,

    /// Maximum wait over the denying buckets; 0 when allowed
    pub wait_ms: u64,

    /// True when a store failure forced a fail-open admission
    pub degraded: bool,
}

/// Non-consuming view of one bucket for status endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStatus {
    pub name: &'static str,
    pub tokens: f64,
    pub last_refill_ms: Option<i64>,
}

pub struct RateLimiter {
    store: Arc<dyn BucketStore>,
    buckets: Vec<Bucket>,
}

impl RateLimiter {
    /// Build a limiter over the given store and bucket settings
    ///
    /// Keys are `{prefix}:{per_second|per_minute|per_hour}`.
    pub fn new(
        store: Arc<dyn BucketStore>,
        settings: &RateLimitSettings,
        key_prefix: &str,
    ) -> Self {
        let bucket = |name: &'static str, settings: BucketSettings| Bucket {
            name,
            key: format!("{}:{}", key_prefix, name),
            settings,
        };

        Self {
            store,
            // Most restrictive first: a denial here costs the other buckets nothing.
            buckets: vec![
                bucket("per_second", settings.per_second),
                bucket("per_minute", settings.per_minute),
                bucket("per_hour", settings.per_hour),
            ],
        }
    }

    /// Attempt to take one token from every bucket
    pub async fn acquire(&self) -> AcquireDecision {
        let now_ms = epoch_ms();
        let mut allowed = true;
        let mut wait_ms = 0u64;
        let mut degraded = false;

        for bucket in &self.buckets {
            match self.store.consume(&bucket.key, &bucket.settings, now_ms).await {
                Ok(reply) => {
                    if !reply.allowed {
                        allowed = false;
                        wait_ms = wait_ms.max(reply.wait_ms);
                        debug!(bucket = bucket.name, wait_ms = reply.wait_ms, "bucket denied token");
                    }
                }
                Err(e) => {
                    // Fail open: a dead store must not halt ingestion silently.
                    warn!(bucket = bucket.name, error = %e, "limiter store unreachable, failing open");
                    degraded = true;
                }
            }
        }

        AcquireDecision { allowed, wait_ms: if allowed { 0 } else { wait_ms }, degraded }
    }

    /// Block until a token is acquired or the deadline expires
    pub async fn wait_for_token(&self, timeout: Duration) -> Result<()> {
        let started = Instant::now();

        loop {
            let decision = self.acquire().await;
            if decision.allowed {
                return Ok(());
            }

            let jitter = rand::thread_rng().gen_range(0..=RETRY_JITTER_MS);
            let sleep_ms = decision.wait_ms + jitter;

            if started.elapsed() + Duration::from_millis(sleep_ms) > timeout {
                return Err(Error::DeadlineExceeded {
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
        }
    }

    /// Per-bucket state without consuming tokens
    ///
    /// A bucket with no stored state reports a full token count, matching
    /// what the first consume would observe.
    pub async fn status(&self) -> Result<Vec<BucketStatus>> {
        let mut statuses = Vec::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            let status = match self.store.peek(&bucket.key).await? {
                Some(BucketState { tokens, last_refill_ms }) => BucketStatus {
                    name: bucket.name,
                    tokens,
                    last_refill_ms: Some(last_refill_ms),
                },
                None => BucketStatus {
                    name: bucket.name,
                    tokens: bucket.settings.capacity as f64,
                    last_refill_ms: None,
                },
            };
            statuses.push(status);
        }
        Ok(statuses)
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use async_trait::async_trait;
    use mf_core::config::BucketSettings;

    fn limiter_with_memory() -> RateLimiter {
        RateLimiter::new(
            Arc::new(MemoryStore::new()),
            &RateLimitSettings::default(),
            "test:ratelimit",
        )
    }

    #[tokio::test]
    async fn test_acquire_consumes_all_buckets() {
        let limiter = limiter_with_memory();
        let decision = limiter.acquire().await;
        assert!(decision.allowed);
        assert_eq!(decision.wait_ms, 0);

        let status = limiter.status().await.unwrap();
        assert_eq!(status[0].tokens, 1.0); // per_second: 2 - 1
        assert_eq!(status[1].tokens, 49.0); // per_minute: 50 - 1
        assert_eq!(status[2].tokens, 299.0); // per_hour: 300 - 1
    }

    #[tokio::test]
    async fn test_status_reports_full_for_untouched_buckets() {
        let limiter = limiter_with_memory();
        let status = limiter.status().await.unwrap();
        assert_eq!(status.len(), 3);
        assert_eq!(status[0].tokens, 2.0);
        assert!(status[0].last_refill_ms.is_none());
    }

    #[tokio::test]
    async fn test_wait_for_token_deadline() {
        let limiter = limiter_with_memory();
        // Drain the per-second bucket.
        assert!(limiter.acquire().await.allowed);
        assert!(limiter.acquire().await.allowed);

        let result = limiter.wait_for_token(Duration::from_millis(5)).await;
        assert!(matches!(result, Err(Error::DeadlineExceeded { .. })));
    }

    #[tokio::test]
    async fn test_wait_for_token_recovers_after_refill() {
        let limiter = limiter_with_memory();
        assert!(limiter.acquire().await.allowed);
        assert!(limiter.acquire().await.allowed);

        // A token accrues after 500 ms; a 2 s deadline is plenty.
        limiter.wait_for_token(Duration::from_secs(2)).await.unwrap();
    }

    struct BrokenStore;

    #[async_trait]
    impl BucketStore for BrokenStore {
        async fn consume(
            &self,
            _key: &str,
            _settings: &BucketSettings,
            _now_ms: i64,
        ) -> crate::Result<crate::bucket::ConsumeReply> {
            Err(Error::Store("connection refused".to_string()))
        }

        async fn peek(&self, _key: &str) -> crate::Result<Option<BucketState>> {
            Err(Error::Store("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fail_open_on_store_error() {
        let limiter =
            RateLimiter::new(Arc::new(BrokenStore), &RateLimitSettings::default(), "test");
        let decision = limiter.acquire().await;
        assert!(decision.allowed);
        assert!(decision.degraded);
    }
}
