//! In-memory bucket store
//!
//! Backs unit tests and single-process development runs. Atomicity comes
//! from the mutex; the arithmetic is the shared reference implementation in
//! [`crate::bucket`].

use crate::bucket::{self, BucketState, ConsumeReply};
use crate::{BucketStore, Result};
use async_trait::async_trait;
use mf_core::config::BucketSettings;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    buckets: Mutex<HashMap<String, BucketState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BucketStore for MemoryStore {
    async fn consume(
        &self,
        key: &str,
        settings: &BucketSettings,
        now_ms: i64,
    ) -> Result<ConsumeReply> {
        let mut buckets =
            self.buckets.lock().map_err(|_| crate::Error::Store("store mutex poisoned".into()))?;
        let (state, reply) = bucket::consume(buckets.get(key).copied(), settings, now_ms);
        buckets.insert(key.to_string(), state);
        Ok(reply)
    }

    async fn peek(&self, key: &str) -> Result<Option<BucketState>> {
        let buckets =
            self.buckets.lock().map_err(|_| crate::Error::Store("store mutex poisoned".into()))?;
        Ok(buckets.get(key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BucketSettings {
        BucketSettings { capacity: 2, refill_rate: 2, interval_ms: 1_000 }
    }

    #[tokio::test]
    async fn test_consume_persists_state() {
        let store = MemoryStore::new();
        let reply = store.consume("b", &settings(), 0).await.unwrap();
        assert!(reply.allowed);

        let state = store.peek("b").await.unwrap().unwrap();
        assert_eq!(state.tokens, 1.0);
    }

    #[tokio::test]
    async fn test_peek_does_not_consume() {
        let store = MemoryStore::new();
        store.consume("b", &settings(), 0).await.unwrap();
        let before = store.peek("b").await.unwrap().unwrap();
        let after = store.peek("b").await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_sliding_window_bound() {
        // Across any window of one interval, admissions never exceed capacity.
        let store = MemoryStore::new();
        let settings = settings();
        let mut admitted = 0;
        for step_ms in (0..1_000).step_by(50) {
            let reply = store.consume("b", &settings, step_ms).await.unwrap();
            if reply.allowed {
                admitted += 1;
            }
        }
        // Initial burst of 2 plus one token accrued at 500 ms.
        assert!(admitted <= settings.capacity + 1);
    }
}
