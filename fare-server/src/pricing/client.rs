//! HTTP client for the live pricing service.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use super::PricingService;
use super::error::PricingError;
use super::live::LiveQuote;

const DEFAULT_PATH: &str = "/webhook";

/// Request body sent to the service.
#[derive(Debug, Serialize)]
struct QuoteRequest<'a> {
    origin: &'a str,
    destination: &'a str,
    when: &'a str,
}

/// Configuration for the pricing client.
#[derive(Debug, Clone)]
pub struct PricingClientConfig {
    /// Service root, e.g. `https://pricing.example.com`
    pub base_url: String,
    /// Path appended to `base_url`
    pub path: String,
    /// Sent as `x-api-key` when set
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PricingClientConfig {
    /// Create a config for the given service root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: DEFAULT_PATH.to_string(),
            api_key: None,
            timeout_secs: 25,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.is_empty() {
            base.to_string()
        } else if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}

/// Client for the pricing service.
#[derive(Debug, Clone)]
pub struct PricingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PricingClient {
    /// Create a new pricing client.
    pub fn new(config: PricingClientConfig) -> Result<Self, PricingError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| PricingError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PricingService for PricingClient {
    async fn quote(
        &self,
        origin: &str,
        destination: &str,
        when: &str,
    ) -> Result<LiveQuote, PricingError> {
        let request = QuoteRequest {
            origin,
            destination,
            when,
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PricingError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PricingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PricingError::Json {
                message: e.to_string(),
            })?;

        LiveQuote::from_value(value)
    }
}
