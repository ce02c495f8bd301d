//! Upstash REST bucket store
//!
//! The HTTP-based Redis variant. The same Lua script used by the direct
//! Redis backend is submitted through the REST `EVAL` endpoint, so the
//! consume step stays atomic server-side; only the transport differs.

use crate::bucket::{BucketState, ConsumeReply, LIMITER_KEY_TTL_SECS};
use crate::{BucketStore, Error, Result};
use async_trait::async_trait;
use mf_core::config::BucketSettings;
use serde_json::Value;

const CONSUME_SCRIPT: &str = include_str!("consume.lua");

pub struct UpstashStore {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl UpstashStore {
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Store(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), token })
    }

    /// Run one Redis command through the REST endpoint
    async fn command(&self, parts: Vec<Value>) -> Result<Value> {
        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&parts)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(Error::Store(format!("Upstash returned {}: {}", status, body)));
        }
        if let Some(err) = body.get("error").and_then(Value::as_str) {
            return Err(Error::Store(format!("Upstash error: {}", err)));
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| Error::MalformedReply("missing 'result' in Upstash reply".to_string()))
    }
}

#[async_trait]
impl BucketStore for UpstashStore {
    async fn consume(
        &self,
        key: &str,
        settings: &BucketSettings,
        now_ms: i64,
    ) -> Result<ConsumeReply> {
        let result = self
            .command(vec![
                Value::from("EVAL"),
                Value::from(CONSUME_SCRIPT),
                Value::from("1"),
                Value::from(key),
                Value::from(settings.capacity.to_string()),
                Value::from(settings.refill_rate.to_string()),
                Value::from(settings.interval_ms.to_string()),
                Value::from(now_ms.to_string()),
                Value::from(LIMITER_KEY_TTL_SECS.to_string()),
            ])
            .await?;

        let parts = result
            .as_array()
            .ok_or_else(|| Error::MalformedReply(format!("script reply {}", result)))?;
        let allowed = parts.first().and_then(Value::as_i64);
        let tokens = parts.get(1).and_then(Value::as_str).and_then(|s| s.parse::<f64>().ok());
        let wait_ms = parts.get(2).and_then(Value::as_i64);

        match (allowed, tokens, wait_ms) {
            (Some(allowed), Some(tokens), Some(wait_ms)) => {
                Ok(ConsumeReply { allowed: allowed == 1, tokens, wait_ms: wait_ms.max(0) as u64 })
            }
            _ => Err(Error::MalformedReply(format!("script reply {}", result))),
        }
    }

    async fn peek(&self, key: &str) -> Result<Option<BucketState>> {
        let result = self
            .command(vec![
                Value::from("HMGET"),
                Value::from(key),
                Value::from("tokens"),
                Value::from("last_refill"),
            ])
            .await?;

        let parts = result
            .as_array()
            .ok_or_else(|| Error::MalformedReply(format!("HMGET reply {}", result)))?;
        let tokens = parts.first().and_then(Value::as_str).and_then(|s| s.parse::<f64>().ok());
        let last_refill_ms = parts.get(1).and_then(|v| match v {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        });

        match (tokens, last_refill_ms) {
            (Some(tokens), Some(last_refill_ms)) => {
                Ok(Some(BucketState { tokens, last_refill_ms }))
            }
            _ => Ok(None),
        }
    }
}
