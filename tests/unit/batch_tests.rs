/*!
 * Tests for batch scheduling, deduplication and progress reporting
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use yamt::app_config::SchedulerConfig;
use yamt::errors::ProviderError;
use yamt::formats::TranslationUnit;
use yamt::providers::mock::MockProvider;
use yamt::providers::Provider;
use yamt::translation::batch::BatchScheduler;
use yamt::translation::core::{RetryPolicy, Translator};
use yamt::translation::classifier::SkipClassifier;
use yamt::translation::pipeline::{NoProgress, ProgressSink};

use crate::common;

/// Progress sink recording every call
#[derive(Default)]
struct CountingProgress {
    total: AtomicUsize,
    ticks: AtomicUsize,
}

impl ProgressSink for CountingProgress {
    fn begin(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider recording how many calls run at the same time
#[derive(Debug, Default)]
struct ConcurrencyGauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[derive(Debug)]
struct TrackedProvider(Arc<ConcurrencyGauge>);

#[async_trait]
impl Provider for TrackedProvider {
    async fn translate(&self, text: &str, _source: &str, target_language: &str) -> Result<String, ProviderError> {
        let now = self.0.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("[{}] {}", target_language, text))
    }

    fn name(&self) -> &str {
        "tracked"
    }
}

fn units(texts: &[&str]) -> Vec<TranslationUnit> {
    texts
        .iter()
        .enumerate()
        .map(|(position, text)| TranslationUnit::translatable(position, format!("k{}", position), *text, *text))
        .collect()
}

fn scheduler(provider: &MockProvider, batch_size: usize, max_workers: usize) -> BatchScheduler {
    let mut retry = RetryPolicy::default();
    retry.base_delay = std::time::Duration::from_millis(1);
    BatchScheduler::new(
        Translator::new(SkipClassifier::default(), retry),
        Arc::new(provider.clone()),
        &SchedulerConfig {
            batch_size,
            max_workers,
        },
    )
}

#[test]
fn test_worker_count_shouldNotExceedBatchCount() {
    let provider = MockProvider::working();
    let scheduler = scheduler(&provider, 50, 6);

    assert_eq!(scheduler.worker_count(2), 2);
    assert_eq!(scheduler.worker_count(10), 6);
}

#[test]
fn test_plan_shouldDeduplicateAndSortOutSkippedAndCached() {
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    cache.put("en", "pt", "Shield", "Escudo");
    let provider = MockProvider::working();

    let mut doc = units(&["Sword", "Shield", "Sword", "piece_wood_01", "Axe"]);
    doc.push(TranslationUnit::passthrough(5, "# comment"));

    let plan = scheduler(&provider, 50, 6).plan(&doc, "en", "pt", &cache);

    assert_eq!(plan.unique, vec!["Sword", "Shield", "piece_wood_01", "Axe"]);
    assert_eq!(plan.skipped, 1);
    assert_eq!(plan.cache_hits, 1);
    assert_eq!(plan.pending, vec!["Sword", "Axe"]);
}

#[tokio::test]
async fn test_schedule_all_withDuplicates_shouldCallProviderOncePerText() {
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    let provider = MockProvider::working().with_custom_response(common::portuguese);
    let doc = units(&["Sword", "Sword", "Shield", "Sword"]);

    let report = scheduler(&provider, 1, 4)
        .schedule_all(&doc, "en", "pt", &cache, &NoProgress)
        .await;

    assert_eq!(report.unique_texts, 2);
    assert_eq!(report.translated, 2);
    assert_eq!(report.batches, 2);
    assert_eq!(provider.requests_for("Sword"), 1);
    assert_eq!(cache.get("en", "pt", "Sword"), Some("Espada".to_string()));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_schedule_all_withManyBatches_shouldTranslateEverything() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    let provider = MockProvider::working();
    let texts: Vec<String> = (0..40).map(|i| format!("Line number {}", i)).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let doc = units(&text_refs);
    let progress = CountingProgress::default();

    let report = scheduler(&provider, 3, 4)
        .schedule_all(&doc, "en", "pt", &cache, &progress)
        .await;

    assert_eq!(report.translated, 40);
    assert_eq!(report.batches, 14);
    assert_eq!(provider.request_count(), 40);
    assert_eq!(progress.total.load(Ordering::SeqCst), 40);
    assert_eq!(progress.ticks.load(Ordering::SeqCst), 40);
    for text in &texts {
        assert_eq!(cache.get("en", "pt", text), Some(format!("[pt] {}", text)));
    }
}

#[tokio::test]
async fn test_schedule_all_withFailingText_shouldCountFailureAndContinue() {
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    let provider = MockProvider::working().with_failing_texts(&["Forge"]);
    let doc = units(&["Forge", "Anvil", "Hammer"]);

    let report = scheduler(&provider, 2, 2)
        .schedule_all(&doc, "en", "pt", &cache, &NoProgress)
        .await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.translated, 2);
    assert_eq!(provider.requests_for("Forge"), 3);
    assert!(cache.get("en", "pt", "Forge").is_none());
    assert_eq!(cache.get("en", "pt", "Anvil"), Some("[pt] Anvil".to_string()));
}

#[tokio::test]
async fn test_schedule_all_withUnchangedResults_shouldNotCache() {
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    let provider = MockProvider::echo();
    let doc = units(&["Valheim", "Odin"]);

    let report = scheduler(&provider, 50, 6)
        .schedule_all(&doc, "en", "pt", &cache, &NoProgress)
        .await;

    assert_eq!(report.unchanged, 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_schedule_all_withNothingPending_shouldNotCallProvider() {
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    cache.put("en", "pt", "Sword", "Espada");
    let provider = MockProvider::working();
    let doc = units(&["Sword", "42", "piece_wood_01"]);
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let progress = move || {
        counter.fetch_add(1, Ordering::SeqCst);
    };

    let report = scheduler(&provider, 50, 6)
        .schedule_all(&doc, "en", "pt", &cache, &progress)
        .await;

    assert_eq!(report.cache_hits, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.batches, 0);
    assert_eq!(provider.request_count(), 0);
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_schedule_all_withManyBatches_shouldNotExceedWorkerCount() {
    let dir = common::create_temp_dir().unwrap();
    let cache = common::empty_cache(dir.path());
    let gauge = Arc::new(ConcurrencyGauge::default());
    let factory_gauge = gauge.clone();
    let mut retry = RetryPolicy::default();
    retry.base_delay = Duration::from_millis(1);
    let scheduler = BatchScheduler::new(
        Translator::new(SkipClassifier::default(), retry),
        Arc::new(move || Box::new(TrackedProvider(factory_gauge.clone())) as Box<dyn Provider>),
        &SchedulerConfig {
            batch_size: 2,
            max_workers: 3,
        },
    );
    let texts: Vec<String> = (0..24).map(|i| format!("Line number {}", i)).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let report = scheduler
        .schedule_all(&units(&text_refs), "en", "pt", &cache, &NoProgress)
        .await;

    assert_eq!(report.translated, 24);
    assert_eq!(report.batches, 12);
    let peak = gauge.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 3, "peak concurrency was {}", peak);
}
