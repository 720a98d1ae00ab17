use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::formats::KeyValuePolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO, optionally with a region such as `zh-CN`)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO, optionally with a region such as `zh-CN`)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Google web translate settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Ollama settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Batch scheduling settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Retry/backoff settings for provider calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Skip classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Persistent cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Which key/value lines are translated in line-oriented files
    #[serde(default)]
    pub key_value_policy: KeyValuePolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translate
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Google web translate configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleConfig {
    /// Service endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Ollama service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    /// Model name (e.g., "llama3.2", "mistral")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Batch scheduling configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// Maximum number of unique texts per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Upper bound on concurrently running batches
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
        }
    }
}

/// Retry configuration for provider calls
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total number of attempts per text (first call included)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after every failed attempt
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,

    /// Upper bound for a single provider call, in seconds (0 disables it)
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            growth_factor: default_growth_factor(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

/// Skip classifier configuration
///
/// The defaults carry the technical prefixes seen in Valheim mods; other mod
/// ecosystems override `technical_prefixes`/`technical_suffixes` instead of
/// touching code.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Trimmed texts shorter than this are never translated
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Pattern a text must fully match to be treated as an identifier
    /// (only applied to texts with two or more underscores)
    #[serde(default = "default_identifier_pattern")]
    pub identifier_pattern: String,

    /// Texts starting with one of these are never translated
    #[serde(default = "default_technical_prefixes")]
    pub technical_prefixes: Vec<String>,

    /// Texts ending with one of these are never translated
    #[serde(default = "default_technical_suffixes")]
    pub technical_suffixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            identifier_pattern: default_identifier_pattern(),
            technical_prefixes: default_technical_prefixes(),
            technical_suffixes: default_technical_suffixes(),
        }
    }
}

/// Persistent cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Location of the JSON cache file
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,

    /// Seed the cache from an existing symmetric YAML output file
    #[serde(default = "default_true")]
    pub merge_existing_output: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            merge_existing_output: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "pt".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.3
}

fn default_batch_size() -> usize {
    50
}

fn default_max_workers() -> usize {
    6
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    300
}

fn default_growth_factor() -> f64 {
    1.8
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_min_length() -> usize {
    2
}

fn default_identifier_pattern() -> String {
    r"^[\w\-\[\]]+$".to_string()
}

fn default_technical_prefixes() -> Vec<String> {
    ["piece_", "rae_", "sapling_", "Pickable_", "IG_", "config_", "mod_", "$"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_technical_suffixes() -> Vec<String> {
    ["_TW", "_id", "_ID"].iter().map(|s| s.to_string()).collect()
}

fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("yamt"))
        .unwrap_or_else(|| PathBuf::from("Cache"))
        .join("translations_cache.json")
}

fn default_true() -> bool {
    true
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_tag(&self.source_language)
            .context("Invalid source language")?;
        crate::language_utils::validate_language_tag(&self.target_language)
            .context("Invalid target language")?;

        if self.scheduler.batch_size == 0 {
            return Err(anyhow!("scheduler.batch_size must be greater than zero"));
        }
        if self.scheduler.max_workers == 0 {
            return Err(anyhow!("scheduler.max_workers must be greater than zero"));
        }
        if self.retry.max_attempts == 0 {
            return Err(anyhow!("retry.max_attempts must be at least 1"));
        }
        if !(self.retry.growth_factor >= 1.0) {
            return Err(anyhow!(
                "retry.growth_factor must be at least 1.0, got {}",
                self.retry.growth_factor
            ));
        }

        regex::Regex::new(&self.classifier.identifier_pattern)
            .with_context(|| format!("Invalid classifier.identifier_pattern: {}", self.classifier.identifier_pattern))?;

        if self.provider == TranslationProvider::Ollama && self.ollama.model.trim().is_empty() {
            return Err(anyhow!("ollama.model is required for the Ollama provider"));
        }

        Ok(())
    }

    /// Load the configuration file, creating it with defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
            }
        }
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            provider: TranslationProvider::default(),
            google: GoogleConfig::default(),
            ollama: OllamaConfig::default(),
            scheduler: SchedulerConfig::default(),
            retry: RetryConfig::default(),
            classifier: ClassifierConfig::default(),
            cache: CacheConfig::default(),
            key_value_policy: KeyValuePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}
