/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - Google: the public web translate endpoint
 * - Ollama: Local LLM server
 * - Mock: scripted provider for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a single text
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_language` - Language tag of `text`
    /// * `target_language` - Language tag to translate into
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Short provider name for logs and summaries
    fn name(&self) -> &str;
}

/// Produces one provider handle per concurrent worker
pub trait ProviderFactory: Send + Sync {
    fn create(&self) -> Box<dyn Provider>;
}

impl<F> ProviderFactory for F
where
    F: Fn() -> Box<dyn Provider> + Send + Sync,
{
    fn create(&self) -> Box<dyn Provider> {
        self()
    }
}

/// Factory building the provider selected in the configuration
#[derive(Debug, Clone)]
pub struct ConfiguredProviderFactory {
    config: Config,
}

impl ConfiguredProviderFactory {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }
}

impl ProviderFactory for ConfiguredProviderFactory {
    fn create(&self) -> Box<dyn Provider> {
        match self.config.provider {
            TranslationProvider::Google => Box::new(google::GoogleTranslate::new(&self.config.google)),
            TranslationProvider::Ollama => Box::new(ollama::Ollama::new(&self.config.ollama)),
        }
    }
}

pub mod google;
pub mod mock;
pub mod ollama;
