/*!
 * Pipeline orchestrator for translating a single file.
 *
 * The orchestrator owns the cache for the duration of a run: it is loaded at
 * the start, filled by the batch scheduler and flushed once the output has
 * been written.
 */

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::formats::{adapter_for, FileFormat, KeyValuePolicy, TranslationUnit};
use crate::providers::ProviderFactory;
use crate::translation::batch::BatchScheduler;
use crate::translation::cache::TranslationCache;
use crate::translation::core::Translator;

use super::progress::ProgressSink;

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// File that was translated
    pub input_path: PathBuf,
    /// File that was written
    pub output_path: PathBuf,
    /// Detected input format
    pub format: FileFormat,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Every unit of the document, structure included
    pub total_units: usize,
    /// Units carrying translatable text
    pub translatable_units: usize,
    /// Units whose output text differs from the input
    pub translated_count: usize,
    /// Distinct candidate texts
    pub unique_texts: usize,
    /// Distinct texts served from the cache
    pub cache_hits: usize,
    /// Distinct texts translated by the provider during this run
    pub newly_translated: usize,
    /// Distinct texts the provider left unchanged
    pub unchanged: usize,
    /// Distinct texts that could not be translated
    pub failed: usize,
    /// Distinct texts rejected by the classifier
    pub skipped: usize,
    /// Cache entries seeded from an existing output file
    pub seeded_from_output: usize,
    /// Cache size at the end of the run
    pub cache_size: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// `(total_units, translated_count)`
    pub fn counts(&self) -> (usize, usize) {
        (self.total_units, self.translated_count)
    }

    /// Newly translated texts per second
    pub fn translation_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.newly_translated as f64 / secs
        } else {
            0.0
        }
    }
}

/// Bookkeeping for the run in progress
struct PipelineRun {
    source_language: String,
    target_language: String,
    total_units: usize,
    translated_count: usize,
    started_at: Instant,
}

/// Translates files end to end
pub struct Pipeline {
    config: Config,
    translator: Translator,
    factory: Arc<dyn ProviderFactory>,
}

impl Pipeline {
    /// Create a pipeline from configuration and a provider factory
    pub fn new(config: Config, factory: Arc<dyn ProviderFactory>) -> Result<Self, PipelineError> {
        let translator = Translator::from_config(&config)
            .map_err(|e| PipelineError::InvalidConfig(format!("classifier.identifier_pattern: {}", e)))?;
        Ok(Self {
            config,
            translator,
            factory,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate `input` into `output`
    ///
    /// Unsupported formats and missing inputs fail before anything is
    /// written. When only the cache cannot be saved, the output is still
    /// written and the summary travels inside `PipelineError::CacheWrite`.
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        source_language: &str,
        target_language: &str,
        progress: &dyn ProgressSink,
    ) -> Result<RunSummary, PipelineError> {
        let format = FileFormat::from_path(input)?;
        let adapter = adapter_for(format, self.config.key_value_policy)?;

        if !FileManager::file_exists(input) {
            return Err(PipelineError::MissingInput(input.to_path_buf()));
        }

        let mut run = PipelineRun {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            total_units: 0,
            translated_count: 0,
            started_at: Instant::now(),
        };

        info!("Reading {} file {:?}", format, input);
        let content = FileManager::read_to_string(input)?;
        let mut units = adapter.decompose(&content)?;
        run.total_units = units.len();

        let cache = TranslationCache::load(&self.config.cache.path);
        let seeded = if self.config.cache.merge_existing_output {
            self.seed_from_output(format, output, &run, &cache)
        } else {
            0
        };
        if seeded > 0 {
            info!("Seeded {} translations from existing output {:?}", seeded, output);
        }

        info!("Translating {} -> {}", run.source_language, run.target_language);
        let scheduler = BatchScheduler::new(self.translator.clone(), self.factory.clone(), &self.config.scheduler);
        let report = scheduler
            .schedule_all(&units, &run.source_language, &run.target_language, &cache, progress)
            .await;

        run.translated_count = self.substitute(&mut units, &run, &cache);

        info!("Writing {:?}", output);
        let output_content = adapter.recompose(&content, &units)?;
        FileManager::write_atomic(output, &output_content)?;

        let summary = RunSummary {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            format,
            source_language: run.source_language,
            target_language: run.target_language,
            total_units: run.total_units,
            translatable_units: units.iter().filter(|u| u.is_translatable()).count(),
            translated_count: run.translated_count,
            unique_texts: report.unique_texts,
            cache_hits: report.cache_hits,
            newly_translated: report.translated,
            unchanged: report.unchanged,
            failed: report.failed,
            skipped: report.skipped,
            seeded_from_output: seeded,
            cache_size: cache.len(),
            elapsed: run.started_at.elapsed(),
        };

        if let Err(source) = cache.save() {
            warn!("{}", source);
            return Err(PipelineError::CacheWrite {
                summary: Box::new(summary),
                source,
            });
        }

        Ok(summary)
    }

    /// Fill in `translation` for every unit with a cached translation
    ///
    /// Returns the number of units whose text changes.
    fn substitute(&self, units: &mut [TranslationUnit], run: &PipelineRun, cache: &TranslationCache) -> usize {
        let classifier = self.translator.classifier();
        let mut changed = 0;

        for unit in units.iter_mut().filter(|u| u.is_translatable()) {
            if classifier.should_skip(&unit.normalized_text) {
                continue;
            }
            unit.translation = cache.get(&run.source_language, &run.target_language, &unit.normalized_text);
            if unit.changed_translation().is_some() {
                changed += 1;
            }
        }

        changed
    }

    /// Seed the cache from a previous output of the same document
    ///
    /// Only symmetric YAML dumps carry their source text, as the key of each
    /// line, so only they can be read back as `source -> translation`. Any
    /// other output says nothing about which source text a value came from.
    fn seed_from_output(
        &self,
        format: FileFormat,
        output: &Path,
        run: &PipelineRun,
        cache: &TranslationCache,
    ) -> usize {
        if format != FileFormat::Yaml || self.config.key_value_policy != KeyValuePolicy::SymmetricEntries {
            debug!("Not seeding from {:?}: {} output does not record its source text", output, format);
            return 0;
        }

        cache.merge_from_existing_output(output, &run.source_language, &run.target_language)
    }
}
