/*!
 * # yamt - Yet Another Mod Translator
 *
 * A Rust library for translating the human-readable text inside game-mod
 * data files while leaving their structure untouched.
 *
 * ## Features
 *
 * - Line-oriented YAML with multi-line block scalars, plus JSON, XML, TOML,
 *   CSV, INI/CFG and plain text
 * - Heuristic skip classifier for ids, numbers, paths and URLs
 * - Persistent translation cache that makes repeated runs incremental
 * - Concurrent batch scheduling with retry, backoff and per-call timeouts
 * - Translation providers:
 *   - Google web translate
 *   - Ollama (local LLM)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `formats`: Decomposition and recomposition of every supported file format
 * - `translation`: Translation engine:
 *   - `translation::classifier`: Decides which texts are worth translating
 *   - `translation::cache`: Persistent translation cache
 *   - `translation::core`: Single-text translation with retries
 *   - `translation::batch`: Concurrent batch scheduling
 *   - `translation::pipeline`: End-to-end file translation
 * - `file_utils`: File system operations
 * - `language_utils`: Language tag utilities
 * - `providers`: Client implementations for the translation services
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{CacheError, FormatError, PipelineError, ProviderError};
pub use formats::{FileFormat, FormatAdapter, KeyValuePolicy, TranslationUnit};
pub use language_utils::{get_language_name, language_codes_match, validate_language_tag};
pub use providers::{Provider, ProviderFactory};
pub use translation::{Pipeline, ProgressSink, RunSummary, TranslationCache, Translator};
