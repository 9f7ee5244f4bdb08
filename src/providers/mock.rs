/*!
 * Mock provider for tests and benchmarks.
 *
 * - `MockProvider::working()` - Always succeeds with a tagged translation
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Every provider also tracks how many requests ran at the same time, so
 * tests can check the concurrency limit of the batch engine.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Total requests received
    request_count: Arc<AtomicUsize>,
    /// Requests currently running
    in_flight: Arc<AtomicUsize>,
    /// Highest value `in_flight` reached
    max_in_flight: Arc<AtomicUsize>,
    /// Every request received, in arrival order
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
    /// Per-request delay (optional)
    delay: Option<fn(&TranslationRequest) -> Duration>,
    /// Requests matching this predicate fail (optional)
    fail_when: Option<fn(&TranslationRequest) -> bool>,
}

/// Decrements the in-flight counter even if the request future is dropped
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
            delay: None,
            fail_when: None,
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

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Delay each request by an amount derived from the request
    pub fn with_delay(mut self, delay: fn(&TranslationRequest) -> Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the requests matching `predicate`
    pub fn with_failure_when(mut self, predicate: fn(&TranslationRequest) -> bool) -> Self {
        self.fail_when = Some(predicate);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Copy of every request received
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    fn respond(&self, request: &TranslationRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[TRANSLATED to {}] {}", request.target_language, request.text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            in_flight: Arc::clone(&self.in_flight),
            max_in_flight: Arc::clone(&self.max_in_flight),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
            delay: self.delay,
            fail_when: self.fail_when,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(&self.in_flight);
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(request)).await;
        } else {
            // let other requests start so overlap is observable
            tokio::task::yield_now().await;
        }

        if let Some(predicate) = self.fail_when {
            if predicate(request) {
                return Err(ProviderError::ApiError {
                    message: format!("Simulated failure for '{}'", request.text),
                    status_code: 500,
                });
            }
        }

        match self.behavior {
            MockBehavior::Working => Ok(self.respond(request)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.respond(request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
