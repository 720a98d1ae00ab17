/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::echo()` - Returns the input unchanged
 *
 * Clones share their request log, so a mock handed to the scheduler as a
 * `ProviderFactory` still reports every call made by every worker.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, ProviderFactory};

/// Mock request for testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Returns the input text unchanged
    Echo,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Every request received, in arrival order
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Texts that always fail regardless of behavior
    failing_texts: Arc<Vec<String>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing_texts: Arc::new(Vec::new()),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that returns its input
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Make requests for these texts always fail
    pub fn with_failing_texts(mut self, texts: &[&str]) -> Self {
        self.failing_texts = Arc::new(texts.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Total number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of requests received for `text`
    pub fn requests_for(&self, text: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.text == text).count()
    }

    /// Snapshot of every request received
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn translated(&self, request: &MockRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[{}] {}", request.target_language, request.text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            failing_texts: Arc::clone(&self.failing_texts),
            custom_response: self.custom_response,
        }
    }
}

impl ProviderFactory for MockProvider {
    fn create(&self) -> Box<dyn Provider> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest {
            text: text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        };
        self.requests.lock().push(request.clone());

        if self.failing_texts.iter().any(|t| t == text) {
            return Err(ProviderError::ApiError {
                message: format!("Simulated failure for '{}'", text),
                status_code: 500,
            });
        }

        match self.behavior {
            MockBehavior::Working => Ok(self.translated(&request)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.translated(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Echo => Ok(request.text),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.translated(&request))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
