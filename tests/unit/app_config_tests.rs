/*!
 * Tests for application configuration functionality
 */

use std::fs;
use std::str::FromStr;

use yamt::app_config::{Config, LogLevel, TranslationProvider};
use yamt::formats::KeyValuePolicy;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt");
    assert_eq!(config.provider, TranslationProvider::Google);
    assert_eq!(config.scheduler.batch_size, 50);
    assert_eq!(config.scheduler.max_workers, 6);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 300);
    assert_eq!(config.classifier.min_length, 2);
    assert_eq!(config.key_value_policy, KeyValuePolicy::Values);
    assert!(config.cache.merge_existing_output);
    assert!(config.cache.path.ends_with("translations_cache.json"));
    assert_eq!(config.ollama.model, "llama3.2");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_language = "english".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "zh-CN".to_string();
    assert!(config.validate().is_ok());

    config.scheduler.batch_size = 0;
    assert!(config.validate().is_err());
    config.scheduler.batch_size = 10;

    config.scheduler.max_workers = 0;
    assert!(config.validate().is_err());
    config.scheduler.max_workers = 2;

    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());
    config.retry.max_attempts = 1;

    config.retry.growth_factor = 0.5;
    assert!(config.validate().is_err());
    config.retry.growth_factor = 1.0;

    config.classifier.identifier_pattern = "([".to_string();
    assert!(config.validate().is_err());
    config.classifier.identifier_pattern = r"^\w+$".to_string();

    config.provider = TranslationProvider::Ollama;
    config.ollama.model = " ".to_string();
    assert!(config.validate().is_err());
    config.ollama.model = "mistral".to_string();

    assert!(config.validate().is_ok());
}

#[test]
fn test_translation_provider_fromStr_shouldParseNames() {
    assert_eq!(TranslationProvider::from_str("google").unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::from_str("Ollama").unwrap(), TranslationProvider::Ollama);
    assert!(TranslationProvider::from_str("deepl").is_err());
    assert_eq!(TranslationProvider::Ollama.to_lowercase_string(), "ollama");
}

#[test]
fn test_log_level_to_level_filter_shouldMatchLevels() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf").join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.target_language, "pt");
    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.scheduler.batch_size, config.scheduler.batch_size);
}

#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "target_language": "fr",
            "provider": "ollama",
            "key_value_policy": "symmetric_entries",
            "scheduler": { "batch_size": 10 },
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.provider, TranslationProvider::Ollama);
    assert_eq!(config.key_value_policy, KeyValuePolicy::SymmetricEntries);
    assert_eq!(config.scheduler.batch_size, 10);
    assert_eq!(config.scheduler.max_workers, 6);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_or_create_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ broken").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_save_shouldWritePrettyJson() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    let mut config = Config::default();
    config.target_language = "de".to_string();

    config.save(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"target_language\": \"de\""));
    assert!(content.contains("\"key_value_policy\": \"values\""));
}
