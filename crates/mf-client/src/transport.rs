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

//! HTTP transport for upstream requests
//!
//! Handles the low-level HTTP communication with the NAV API: request
//! construction, status mapping, and response decoding. There is no retry
//! here: transient upstream failures propagate and the next pipeline run
//! recovers, while a 429 means the limiter is miscalibrated and must
//! surface as a fatal error.

use mf_core::config::MfApiConfig;
use mf_core::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

pub struct Transport {
    client: Client,
    base_url: String,
}

impl Transport {
    /// Create a new transport instance
    pub fn new(config: &MfApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("mf-client/1.0")
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    /// Execute a GET against `{base_url}{path}` and decode the JSON body
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            error!("Upstream returned 429 for {}; limiter calibration is off", url);
            return Err(Error::RateLimitBreach(format!("429 from {}", url)));
        }
        if !status.is_success() {
            error!("HTTP error {} for {}", status, url);
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                message: format!("GET {}", url),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&text).map_err(|e| {
            Error::InvalidResponse(format!("Failed to deserialize response from {}: {}", url, e))
        })
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let config =
            MfApiConfig { base_url: "https://api.mfapi.in/mf".to_string(), timeout_secs: 30 };
        let transport = Transport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "https://api.mfapi.in/mf");
    }

    #[test]
    fn test_transport_strips_trailing_slash() {
        let config =
            MfApiConfig { base_url: "https://api.mfapi.in/mf/".to_string(), timeout_secs: 10 };
        let transport = Transport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "https://api.mfapi.in/mf");
    }
}
