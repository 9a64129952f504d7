/*!
 * Mock translator implementations for testing
 *
 * The mock never leaves the process. It can be told to fail or panic on
 * specific texts, to report itself unavailable, and to hold each call open
 * for a while so concurrency can be observed.
 */

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use docxlate::errors::{ProviderError, TranslationError};
use docxlate::translation::Translator;

/// Tracks calls made to a [`MockTranslator`]
#[derive(Debug, Default)]
pub struct CallTracker {
    /// Number of `translate` calls
    pub calls: AtomicUsize,
    /// Calls currently running
    pub in_flight: AtomicUsize,
    /// Highest value `in_flight` reached
    pub max_in_flight: AtomicUsize,
}

impl CallTracker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Configurable in-process translator
#[derive(Debug, Default)]
pub struct MockTranslator {
    tracker: Arc<CallTracker>,
    prefix: String,
    delay: Option<Duration>,
    jitter_ms: u64,
    fail_on: HashSet<String>,
    panic_on: HashSet<String>,
    unavailable: bool,
}

impl MockTranslator {
    /// Translates `text` to `ES:text`
    pub fn new() -> Self {
        Self {
            prefix: "ES:".to_string(),
            ..Self::default()
        }
    }

    /// Hold every call open for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a random extra delay of up to `max_ms` to every call
    pub fn with_jitter(mut self, max_ms: u64) -> Self {
        self.jitter_ms = max_ms;
        self
    }

    /// Fail calls for exactly this text
    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on.insert(text.to_string());
        self
    }

    /// Panic on calls for exactly this text
    pub fn panicking_on(mut self, text: &str) -> Self {
        self.panic_on.insert(text.to_string());
        self
    }

    /// Report the capability as unavailable
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Shared call statistics
    pub fn tracker(&self) -> Arc<CallTracker> {
        Arc::clone(&self.tracker)
    }

    /// What the mock answers for `text`
    pub fn expected(text: &str) -> String {
        format!("ES:{}", text)
    }
}

struct InFlightGuard<'a>(&'a CallTracker);

impl<'a> InFlightGuard<'a> {
    fn enter(tracker: &'a CallTracker) -> Self {
        let now = tracker.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        tracker.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(tracker)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        self.tracker.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard::enter(&self.tracker);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.jitter_ms > 0 {
            let extra = rand::rng().random_range(0..=self.jitter_ms);
            tokio::time::sleep(Duration::from_millis(extra)).await;
        }

        if self.panic_on.contains(text) {
            panic!("mock translator exploded on {:?}", text);
        }

        if self.fail_on.contains(text) {
            return Err(TranslationError::Provider(ProviderError::ApiError {
                status_code: 500,
                message: "mock failure".to_string(),
            }));
        }

        Ok(format!("{}{}", self.prefix, text))
    }

    async fn check_available(&self) -> Result<(), TranslationError> {
        if self.unavailable {
            return Err(TranslationError::ServiceUnavailable("mock is offline".to_string()));
        }
        Ok(())
    }

    fn usage_summary(&self) -> Option<String> {
        Some(format!("{} calls", self.tracker.calls()))
    }
}
