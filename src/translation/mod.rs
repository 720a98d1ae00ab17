/*!
 * Translation engine for structured mod files.
 *
 * This module contains the core functionality for translating the text units
 * extracted by the format adapters. It is split into several submodules:
 *
 * - `classifier`: Decides which texts are worth translating
 * - `cache`: Persistent translation cache
 * - `core`: Single-text translation with retry and backoff
 * - `batch`: Deduplication and concurrent batch scheduling
 * - `pipeline`: End-to-end orchestration of a file translation
 */

// Re-export main types for easier usage
pub use self::batch::{BatchScheduler, ScheduleReport};
pub use self::cache::TranslationCache;
pub use self::classifier::SkipClassifier;
pub use self::core::{RetryPolicy, TranslationOutcome, Translator};
pub use self::pipeline::{NoProgress, Pipeline, ProgressSink, RunSummary};

// Submodules
pub mod batch;
pub mod cache;
pub mod classifier;
pub mod core;
pub mod pipeline;
