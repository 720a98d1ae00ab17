/*!
 * Core translation client.
 *
 * This module contains the `Translator`, which resolves a single text against
 * the skip classifier, the cache and finally the provider, retrying failed
 * provider calls with exponential backoff.
 */

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, RetryConfig};
use crate::errors::ProviderError;
use crate::providers::Provider;
use super::cache::TranslationCache;
use super::classifier::SkipClassifier;

/// Retry and timeout settings for provider calls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, first call included
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub growth_factor: f64,
    /// Upper bound for a single call
    pub call_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            growth_factor: config.growth_factor,
            call_timeout: (config.call_timeout_secs > 0).then(|| Duration::from_secs(config.call_timeout_secs)),
        }
    }

    /// Sleep before the attempt following failed attempt number `failed_attempt` (1-based)
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1) as i32;
        self.base_delay.mul_f64(self.growth_factor.powi(exponent))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// How a single text was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Classified as machine-facing content; never sent
    Skipped,
    /// Found in the cache
    Cached(String),
    /// Translated by the provider
    Translated(String),
    /// The provider answered with an empty or identical text
    Unchanged,
    /// Every attempt failed
    Failed,
}

impl TranslationOutcome {
    /// Text to use in the output, falling back to `original`
    pub fn text<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Self::Cached(text) | Self::Translated(text) => text,
            Self::Skipped | Self::Unchanged | Self::Failed => original,
        }
    }
}

/// Single-text translation with classification, caching and retries
#[derive(Debug, Clone)]
pub struct Translator {
    classifier: Arc<SkipClassifier>,
    retry: RetryPolicy,
}

impl Translator {
    /// Create a new translator
    pub fn new(classifier: SkipClassifier, retry: RetryPolicy) -> Self {
        Self {
            classifier: Arc::new(classifier),
            retry,
        }
    }

    /// Create a translator from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, regex::Error> {
        Ok(Self::new(
            SkipClassifier::new(&config.classifier)?,
            RetryPolicy::from_config(&config.retry),
        ))
    }

    pub fn classifier(&self) -> &SkipClassifier {
        &self.classifier
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolve `text` without writing to the cache
    pub async fn resolve(
        &self,
        provider: &dyn Provider,
        cache: &TranslationCache,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranslationOutcome {
        if self.classifier.should_skip(text) {
            return TranslationOutcome::Skipped;
        }

        if let Some(cached) = cache.get(source_language, target_language, text) {
            return TranslationOutcome::Cached(cached);
        }

        self.call_with_retry(provider, text, source_language, target_language).await
    }

    /// Translate `text`, caching a successful provider result
    ///
    /// Never fails: skipped, unchanged and failed texts come back as they were.
    pub async fn translate_one(
        &self,
        provider: &dyn Provider,
        cache: &TranslationCache,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> String {
        let outcome = self
            .resolve(provider, cache, text, source_language, target_language)
            .await;

        if let TranslationOutcome::Translated(translation) = &outcome {
            cache.put(source_language, target_language, text, translation);
        }

        outcome.text(text).to_string()
    }

    /// Call the provider until it succeeds or the attempts run out
    pub async fn call_with_retry(
        &self,
        provider: &dyn Provider,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranslationOutcome {
        let mut last_error = None;

        for attempt in 1..=self.retry.max_attempts {
            match self.call_once(provider, text, source_language, target_language).await {
                Ok(result) => {
                    if result.trim().is_empty() || result == text {
                        debug!("Provider returned no change for '{}'", text);
                        return TranslationOutcome::Unchanged;
                    }
                    return TranslationOutcome::Translated(result);
                }
                Err(e) => {
                    debug!(
                        "{} attempt {}/{} failed for '{}': {}",
                        provider.name(),
                        attempt,
                        self.retry.max_attempts,
                        text,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.delay_after(attempt)).await;
            }
        }

        if let Some(e) = last_error {
            warn!(
                "Giving up on '{}' after {} attempts, keeping the original: {}",
                text, self.retry.max_attempts, e
            );
        }
        TranslationOutcome::Failed
    }

    async fn call_once(
        &self,
        provider: &dyn Provider,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let call = provider.translate(text, source_language, target_language);
        match self.retry.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderError::Timeout(limit.as_millis() as u64))?,
            None => call.await,
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(SkipClassifier::default(), RetryPolicy::default())
    }
}
