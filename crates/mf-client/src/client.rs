//! Main NAV API client implementation

use crate::transport::Transport;
use mf_core::config::MfApiConfig;
use mf_core::{Error, Result};
use mf_limiter::{RateLimiter, DEFAULT_ACQUIRE_TIMEOUT};
use mf_models::{SchemeHistory, SchemeHistoryResponse, SchemeRef};
use std::sync::Arc;
use tracing::{info, instrument};

/// The NAV API client
///
/// Wraps the HTTP transport and gates every request on the shared token
/// limiter, so concurrent workers collectively respect the upstream quota.
/// The client is long-lived and cheap to share behind an `Arc`.
pub struct MfApiClient {
    transport: Transport,
    limiter: Arc<RateLimiter>,
}

impl MfApiClient {
    /// Create a new client with the given configuration and limiter
    pub fn new(config: &MfApiConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let transport = Transport::new(config)?;
        info!("NAV API client initialized for {}", transport.base_url());
        Ok(Self { transport, limiter })
    }

    /// Fetch the full scheme catalog
    ///
    /// Tens of thousands of `{schemeCode, schemeName}` pairs; discovery
    /// filters them down to the configured universe.
    #[instrument(skip(self))]
    pub async fn list_schemes(&self) -> Result<Vec<SchemeRef>> {
        self.wait_for_token().await?;
        self.transport.get("/").await
    }

    /// Fetch and normalize the full NAV history of one scheme
    ///
    /// The returned history is ascending by date with ISO dates and decimal
    /// NAVs; the upstream's newest-first ordering never leaks downstream.
    #[instrument(skip(self), fields(scheme_code))]
    pub async fn fetch_scheme(&self, scheme_code: &str) -> Result<SchemeHistory> {
        self.wait_for_token().await?;
        let response: SchemeHistoryResponse =
            self.transport.get(&format!("/{}", scheme_code)).await?;
        response.normalize()
    }

    /// Get access to the shared limiter (for status reporting)
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    async fn wait_for_token(&self) -> Result<()> {
        self.limiter
            .wait_for_token(DEFAULT_ACQUIRE_TIMEOUT)
            .await
            .map_err(|e| Error::Http(format!("rate limiter: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::config::RateLimitSettings;
    use mf_limiter::MemoryStore;

    fn test_client() -> MfApiClient {
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(MemoryStore::new()),
            &RateLimitSettings::default(),
            "test:client",
        ));
        let config =
            MfApiConfig { base_url: "https://api.mfapi.in/mf".to_string(), timeout_secs: 10 };
        MfApiClient::new(&config, limiter).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = test_client();
        assert_eq!(client.transport.base_url(), "https://api.mfapi.in/mf");
    }

    #[tokio::test]
    async fn test_client_consumes_limiter_tokens() {
        let client = test_client();
        client.wait_for_token().await.unwrap();

        let status = client.limiter().status().await.unwrap();
        let per_hour = status.iter().find(|b| b.name == "per_hour").unwrap();
        assert_eq!(per_hour.tokens, 299.0);
    }
}
