use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::app_config::GoogleConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for the public Google web translate endpoint
///
/// This is the keyless endpoint used by browser extensions: one GET per text,
/// answered with nested JSON arrays of translated segments.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Base URL of the service
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
    /// Request timeout in milliseconds, reported on timeouts
    timeout_ms: u64,
}

impl GoogleTranslate {
    /// Create a new client from configuration
    pub fn new(config: &GoogleConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    fn request_url(&self, text: &str, source_language: &str, target_language: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &format!("{}/translate_a/single", self.endpoint),
            &[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", self.endpoint, e)))
    }

    /// Join the translated segments of a response
    ///
    /// The body looks like `[[["Olá","Hello",null,null,10], ...], null, "en", ...]`.
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid JSON from Google: {}", e)))?;

        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Missing translation segments".to_string()))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        Ok(translated)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(text, source_language, target_language)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_ms)
            } else if e.is_connect() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read Google response: {}", e)))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(format!("Google returned {}", status)));
        }
        if !status.is_success() {
            error!("Google translate error ({}): {}", status, body.chars().take(200).collect::<String>());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Self::parse_response(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}
