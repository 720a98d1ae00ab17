/*!
 * Common test utilities for the yamt test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use yamt::app_config::Config;
use yamt::formats::FormatAdapter;
use yamt::providers::mock::{MockProvider, MockRequest};
use yamt::translation::cache::TranslationCache;
use yamt::translation::pipeline::Pipeline;

/// Enable log output for a test run (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration with the cache inside `dir` and fast retries
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.cache.path = dir.join("translations_cache.json");
    config.retry.base_delay_ms = 1;
    config.retry.call_timeout_secs = 5;
    config.scheduler.batch_size = 2;
    config.scheduler.max_workers = 3;
    config
}

/// Pipeline backed by a shared mock provider
pub fn mock_pipeline(config: Config, provider: &MockProvider) -> Pipeline {
    Pipeline::new(config, Arc::new(provider.clone())).expect("test config should be valid")
}

/// Cache stored in `dir`, empty
pub fn empty_cache(dir: &Path) -> TranslationCache {
    TranslationCache::new(dir.join("translations_cache.json"))
}

/// Dictionary-backed translations for en -> pt tests
pub fn portuguese(request: &MockRequest) -> String {
    match request.text.as_str() {
        "Hello" => "Olá".to_string(),
        "Sword" => "Espada".to_string(),
        "Shield" => "Escudo".to_string(),
        "Iron Sword" => "Espada de Ferro".to_string(),
        "Welcome to the forge" => "Bem-vindo à forja".to_string(),
        "Start game" => "Iniciar jogo".to_string(),
        other => format!("pt({})", other),
    }
}

/// Decompose `content`, translate every unit `dictionary` knows and recompose
pub fn translate_document(
    adapter: &dyn FormatAdapter,
    content: &str,
    dictionary: fn(&str) -> Option<&'static str>,
) -> String {
    let mut units = adapter.decompose(content).expect("document should decompose");
    for unit in units.iter_mut().filter(|u| u.is_translatable()) {
        unit.translation = dictionary(&unit.normalized_text).map(str::to_string);
    }
    adapter.recompose(content, &units).expect("document should recompose")
}

/// Small en -> pt dictionary for adapter tests
pub fn dictionary(text: &str) -> Option<&'static str> {
    match text {
        "Hello" => Some("Olá"),
        "Sword" => Some("Espada"),
        "Shield" => Some("Escudo"),
        "Axe" => Some("Machado"),
        "Iron Sword" => Some("Espada de Ferro"),
        "Welcome to the forge" => Some("Bem-vindo à forja"),
        "Start game" => Some("Iniciar jogo"),
        "Read this" => Some("Nota: leia"),
        "Salt & Pepper" => Some("Sal & Pimenta"),
        _ => None,
    }
}
