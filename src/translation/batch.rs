/*!
 * Batch translation processing.
 *
 * Items are translated independently with at most `concurrency_limit` calls
 * in flight. A failing or panicking call resolves its own item to a failure
 * marker and never affects the others.
 */

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use log::{debug, info, warn};
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::TranslationError;

use super::document::{DocumentItem, TranslationOutcome};
use super::Translator;

/// Default text written in place of a failed translation
pub const DEFAULT_FAILURE_MARKER: &str = "[FAILED]";

/// Summary of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Number of items in the batch
    pub total: usize,

    /// Items that received a translation
    pub translated: usize,

    /// Placeholder numbers of items resolved to the failure marker, ascending
    pub failed: Vec<u64>,
}

impl BatchReport {
    /// Whether every item was translated
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Batch translator for document items
pub struct BatchTranslator {
    /// The translation capability
    translator: Arc<dyn Translator>,

    /// Maximum number of concurrent requests, at least 1
    concurrency_limit: usize,

    /// Prefix of the failure marker
    failure_marker: String,
}

impl BatchTranslator {
    /// Create a new batch translator; a limit of 0 is treated as 1
    pub fn new(translator: Arc<dyn Translator>, concurrency_limit: usize) -> Self {
        Self {
            translator,
            concurrency_limit: concurrency_limit.max(1),
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
        }
    }

    /// Use a different failure marker prefix
    pub fn with_failure_marker(mut self, failure_marker: impl Into<String>) -> Self {
        self.failure_marker = failure_marker.into();
        self
    }

    /// Effective concurrency limit
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// The translator's own usage statistics, if it keeps any
    pub fn usage_summary(&self) -> Option<String> {
        self.translator.usage_summary()
    }

    /// Translate every item, writing results back once all calls finished
    ///
    /// `progress` is called with `(completed, total)` after each call. The
    /// only error is an unavailable translator, detected before any item is
    /// sent. Dropping the returned future cancels in-flight calls and leaves
    /// `items` untouched.
    pub async fn translate_all<F>(&self, items: &mut [DocumentItem], progress: F) -> Result<BatchReport, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        self.translator.check_available().await?;

        let total = items.len();
        let start_time = Instant::now();
        let completed = AtomicUsize::new(0);
        let translator = self.translator.as_ref();
        let progress = &progress;
        let completed_ref = &completed;

        let units: Vec<(usize, String)> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (index, item.original_content.clone()))
            .collect();

        let outcomes: Vec<(usize, TranslationOutcome)> = stream::iter(units)
            .map(|(index, text)| async move {
                let outcome = translate_one(translator, &text).await;
                let done = completed_ref.fetch_add(1, Ordering::SeqCst) + 1;
                progress(done, total);
                (index, outcome)
            })
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await;

        let mut report = BatchReport {
            total,
            ..BatchReport::default()
        };

        for (index, outcome) in outcomes {
            let item = &mut items[index];
            match &outcome {
                TranslationOutcome::Translated(_) => {
                    report.translated += 1;
                    debug!("Item {} translated", item.placeholder_number);
                }
                TranslationOutcome::Failed(reason) => {
                    warn!("Item {} failed to translate: {}", item.placeholder_number, reason);
                    report.failed.push(item.placeholder_number);
                }
            }
            item.resolve(outcome, &self.failure_marker);
        }
        report.failed.sort_unstable();

        info!(
            "Translated {}/{} items in {:?} ({} failed)",
            report.translated,
            total,
            start_time.elapsed(),
            report.failed.len()
        );

        Ok(report)
    }
}

/// Translate one unit, turning errors and panics into a failed outcome
async fn translate_one(translator: &dyn Translator, text: &str) -> TranslationOutcome {
    if text.trim().is_empty() {
        return TranslationOutcome::Translated(String::new());
    }

    match AssertUnwindSafe(translator.translate(text)).catch_unwind().await {
        Ok(Ok(translated)) => TranslationOutcome::Translated(translated),
        Ok(Err(e)) => TranslationOutcome::Failed(e.to_string()),
        Err(panic) => TranslationOutcome::Failed(format!("translator panicked: {}", panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
