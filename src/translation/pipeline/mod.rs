/*!
 * Translation pipeline for structured mod files.
 *
 * A run goes through these phases:
 * 1. **Read**: detect the format, read the input and decompose it into units
 * 2. **Seed**: load the cache and seed it from an existing output file
 * 3. **Translate**: deduplicate, classify and schedule the pending texts
 * 4. **Write**: substitute translations, recompose and persist output and cache
 */

pub mod orchestrator;
pub mod progress;

// Re-export types used externally
pub use orchestrator::{Pipeline, RunSummary};
pub use progress::{NoProgress, ProgressSink};
