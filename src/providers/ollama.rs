use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::OllamaConfig;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model used for translation
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Request timeout in milliseconds, reported on timeouts
    timeout_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system message
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

/// Build the system prompt for a language pair
fn system_prompt(source_language: &str, target_language: &str) -> String {
    let source = language_utils::get_language_name(source_language).unwrap_or_else(|_| source_language.to_string());
    let target = language_utils::get_language_name(target_language).unwrap_or_else(|_| target_language.to_string());
    format!(
        "You translate user interface strings of video game mods from {} to {}. \
         Reply with the translation only, without quotes or explanations. \
         Keep placeholders, tags and numbers exactly as they are.",
        source, target
    )
}

impl Ollama {
    /// Create a new Ollama client from configuration
    ///
    /// Ollama typically uses HTTP/1.1, so the client does not force HTTP/2.
    pub fn new(config: &OllamaConfig) -> Self {
        let host = config.endpoint.trim_end_matches('/');
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        let timeout = Duration::from_secs(config.timeout_secs);

        Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Generate text from the Ollama API
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_ms)
            } else if e.is_connect() {
                ProviderError::ConnectionError(format!("Failed to reach Ollama at {}: {}", self.base_url, e))
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text from Ollama API: {}", e)))?;

        if !status.is_success() {
            error!("Ollama API error ({}): {}", status, response_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: response_text,
            });
        }

        serde_json::from_str::<GenerationResponse>(&response_text).map_err(|e| {
            error!(
                "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            );
            ProviderError::ParseError(e.to_string())
        })
    }

    /// Strip wrapping the model sometimes adds around a bare translation
    pub fn clean_response(text: &str) -> String {
        let trimmed = text.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(trimmed);
        unquoted.trim().to_string()
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(&self.model, text)
            .system(system_prompt(source_language, target_language))
            .temperature(self.temperature);

        let response = self.generate(request).await?;
        Ok(Self::clean_response(&response.response))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
