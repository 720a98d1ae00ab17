/*!
 * Batch translation scheduling.
 *
 * This module collects the texts of a document that still need translating,
 * splits them into batches and runs the batches concurrently, merging every
 * result into the cache from a single coordinating loop.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, info};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::SchedulerConfig;
use crate::formats::TranslationUnit;
use crate::providers::ProviderFactory;

use super::cache::TranslationCache;
use super::core::{TranslationOutcome, Translator};
use super::pipeline::ProgressSink;

/// Counters describing one scheduling pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Distinct candidate texts
    pub unique_texts: usize,
    /// Distinct texts rejected by the classifier
    pub skipped: usize,
    /// Distinct texts already in the cache
    pub cache_hits: usize,
    /// Distinct texts newly translated and cached
    pub translated: usize,
    /// Distinct texts the provider returned empty or unchanged
    pub unchanged: usize,
    /// Distinct texts whose every attempt failed
    pub failed: usize,
    /// Number of batches dispatched
    pub batches: usize,
}

/// Candidate texts split by what has to happen to them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePlan {
    /// Distinct candidate texts in first-seen order
    pub unique: Vec<String>,
    /// Number of unique texts rejected by the classifier
    pub skipped: usize,
    /// Number of unique texts already cached
    pub cache_hits: usize,
    /// Texts to send to the provider, in first-seen order
    pub pending: Vec<String>,
}

/// Batch scheduler for running provider calls with bounded concurrency
pub struct BatchScheduler {
    /// Single-text translation logic shared by all workers
    translator: Translator,

    /// Source of one provider handle per batch
    factory: Arc<dyn ProviderFactory>,

    /// Maximum texts per batch
    batch_size: usize,

    /// Maximum number of concurrently running batches
    max_workers: usize,
}

impl BatchScheduler {
    /// Create a new batch scheduler
    pub fn new(translator: Translator, factory: Arc<dyn ProviderFactory>, config: &SchedulerConfig) -> Self {
        Self {
            translator,
            factory,
            batch_size: config.batch_size.max(1),
            max_workers: config.max_workers.max(1),
        }
    }

    /// Number of workers used for `batch_count` batches
    pub fn worker_count(&self, batch_count: usize) -> usize {
        self.max_workers.min(batch_count)
    }

    /// Deduplicate the candidate texts and sort out skipped and cached ones
    pub fn plan(
        &self,
        units: &[TranslationUnit],
        source_language: &str,
        target_language: &str,
        cache: &TranslationCache,
    ) -> SchedulePlan {
        let mut seen = HashSet::new();
        let mut plan = SchedulePlan::default();

        for unit in units.iter().filter(|u| u.is_translatable()) {
            if !seen.insert(unit.normalized_text.as_str()) {
                continue;
            }
            let text = unit.normalized_text.clone();
            plan.unique.push(text.clone());

            if self.translator.classifier().should_skip(&text) {
                plan.skipped += 1;
            } else if cache.get(source_language, target_language, &text).is_some() {
                plan.cache_hits += 1;
            } else {
                plan.pending.push(text);
            }
        }

        plan
    }

    /// Translate every pending text of `units` and merge the results into `cache`
    ///
    /// Returns once every batch has completed. A batch whose task panicked
    /// counts all of its texts as failed.
    pub async fn schedule_all(
        &self,
        units: &[TranslationUnit],
        source_language: &str,
        target_language: &str,
        cache: &TranslationCache,
        progress: &dyn ProgressSink,
    ) -> ScheduleReport {
        let plan = self.plan(units, source_language, target_language, cache);
        let mut report = ScheduleReport {
            unique_texts: plan.unique.len(),
            skipped: plan.skipped,
            cache_hits: plan.cache_hits,
            ..ScheduleReport::default()
        };

        info!(
            "Found {} unique texts: {} skipped, {} cached, {} to translate",
            report.unique_texts,
            report.skipped,
            report.cache_hits,
            plan.pending.len()
        );

        progress.begin(plan.pending.len());
        if plan.pending.is_empty() {
            return report;
        }

        let batches: Vec<Vec<String>> = plan
            .pending
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        let total_batches = batches.len();
        let workers = self.worker_count(total_batches);
        report.batches = total_batches;

        debug!("Dispatching {} batches on {} workers", total_batches, workers);

        // Batches are spawned lazily, so buffer_unordered alone caps the tasks in flight
        let start_time = Instant::now();

        let mut results = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, batch)| {
                let translator = self.translator.clone();
                let provider = self.factory.create();
                let cache = cache.clone();
                let source_language = source_language.to_string();
                let target_language = target_language.to_string();
                let members = batch.clone();

                async move {
                    let handle = tokio::spawn(async move {
                        let mut outcomes = Vec::with_capacity(batch.len());
                        for text in batch {
                            let outcome = translator
                                .resolve(provider.as_ref(), &cache, &text, &source_language, &target_language)
                                .await;
                            outcomes.push((text, outcome));
                        }
                        outcomes
                    });

                    let outcomes = match handle.await {
                        Ok(outcomes) => outcomes,
                        Err(e) => {
                            error!("Batch {} aborted: {}", batch_index + 1, e);
                            members
                                .into_iter()
                                .map(|text| (text, TranslationOutcome::Failed))
                                .collect()
                        }
                    };
                    (batch_index, outcomes)
                }
            })
            .buffer_unordered(workers);

        // Single merge path: only this loop writes results into the cache
        let mut completed = 0;
        while let Some((batch_index, outcomes)) = results.next().await {
            for (text, outcome) in outcomes {
                match outcome {
                    TranslationOutcome::Translated(translation) => {
                        cache.put(source_language, target_language, &text, &translation);
                        report.translated += 1;
                    }
                    TranslationOutcome::Cached(_) => report.cache_hits += 1,
                    TranslationOutcome::Skipped => report.skipped += 1,
                    TranslationOutcome::Unchanged => report.unchanged += 1,
                    TranslationOutcome::Failed => report.failed += 1,
                }
                progress.tick();
            }

            completed += 1;
            let elapsed = start_time.elapsed().as_secs_f64();
            let done = report.translated + report.unchanged + report.failed;
            debug!(
                "Batch {} done ({}/{} batches, {:.1} items/s)",
                batch_index + 1,
                completed,
                total_batches,
                if elapsed > 0.0 { done as f64 / elapsed } else { 0.0 }
            );
        }

        report
    }
}
