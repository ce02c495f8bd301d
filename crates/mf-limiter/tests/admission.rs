//! End-to-end admission behavior over the in-memory store

use mf_core::config::RateLimitSettings;
use mf_limiter::{MemoryStore, RateLimiter};
use std::sync::Arc;

fn fresh_limiter() -> RateLimiter {
    RateLimiter::new(Arc::new(MemoryStore::new()), &RateLimitSettings::default(), "it:ratelimit")
}

#[tokio::test]
async fn three_bucket_admission_burst_then_deny() {
    let limiter = fresh_limiter();

    // Freshly initialized buckets admit a burst of two.
    let first = limiter.acquire().await;
    let second = limiter.acquire().await;
    assert!(first.allowed);
    assert!(second.allowed);

    // The third attempt within the same second is denied by the per-second
    // bucket with roughly half a second of wait (2 tokens/sec refill).
    let third = limiter.acquire().await;
    assert!(!third.allowed);
    assert!(
        (450..=550).contains(&third.wait_ms),
        "expected ~500 ms wait, got {}",
        third.wait_ms
    );
}

#[tokio::test]
async fn denial_still_consumes_from_earlier_buckets() {
    let limiter = fresh_limiter();

    limiter.acquire().await;
    limiter.acquire().await;
    limiter.acquire().await; // denied by per_second, still drains the others

    let status = limiter.status().await.unwrap();
    let per_minute = status.iter().find(|b| b.name == "per_minute").unwrap();
    assert_eq!(per_minute.tokens, 47.0);
}

#[tokio::test]
async fn status_does_not_consume() {
    let limiter = fresh_limiter();
    limiter.acquire().await;

    let before = limiter.status().await.unwrap();
    let after = limiter.status().await.unwrap();
    assert_eq!(before, after);
}
