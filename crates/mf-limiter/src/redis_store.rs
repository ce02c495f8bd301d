//! Redis-backed bucket store
//!
//! The refill-and-consume step runs as a server-side Lua script, so the
//! read-modify-write is atomic even with many workers hammering the same
//! bucket. The script mirrors [`crate::bucket::consume`] exactly.
//!
//! `redis::Script` invokes by SHA and transparently reloads the script body
//! once on a `NOSCRIPT` reply, which covers script-cache flushes after a
//! server restart.

use crate::bucket::{BucketState, ConsumeReply, LIMITER_KEY_TTL_SECS};
use crate::{BucketStore, Error, Result};
use async_trait::async_trait;
use mf_core::config::BucketSettings;
use redis::aio::ConnectionManager;
use redis::Script;

/// Lua mirror of the bucket arithmetic in `bucket.rs`
const CONSUME_SCRIPT: &str = include_str!("consume.lua");

pub struct RedisStore {
    conn: ConnectionManager,
    script: Script,
}

impl RedisStore {
    /// Connect to the Redis server behind `url`
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, script: Script::new(CONSUME_SCRIPT) })
    }
}

#[async_trait]
impl BucketStore for RedisStore {
    async fn consume(
        &self,
        key: &str,
        settings: &BucketSettings,
        now_ms: i64,
    ) -> Result<ConsumeReply> {
        let mut conn = self.conn.clone();
        let (allowed, tokens, wait_ms): (i64, String, i64) = self
            .script
            .key(key)
            .arg(settings.capacity)
            .arg(settings.refill_rate)
            .arg(settings.interval_ms)
            .arg(now_ms)
            .arg(LIMITER_KEY_TTL_SECS)
            .invoke_async(&mut conn)
            .await?;

        let tokens: f64 = tokens
            .parse()
            .map_err(|_| Error::MalformedReply(format!("token count '{}' from script", tokens)))?;

        Ok(ConsumeReply { allowed: allowed == 1, tokens, wait_ms: wait_ms.max(0) as u64 })
    }

    async fn peek(&self, key: &str) -> Result<Option<BucketState>> {
        let mut conn = self.conn.clone();
        let (tokens, last_refill): (Option<String>, Option<i64>) = redis::cmd("HMGET")
            .arg(key)
            .arg("tokens")
            .arg("last_refill")
            .query_async(&mut conn)
            .await?;

        match (tokens, last_refill) {
            (Some(tokens), Some(last_refill_ms)) => {
                let tokens: f64 = tokens.parse().map_err(|_| {
                    Error::MalformedReply(format!("token count '{}' in bucket hash", tokens))
                })?;
                Ok(Some(BucketState { tokens, last_refill_ms }))
            }
            _ => Ok(None),
        }
    }
}
