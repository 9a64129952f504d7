/*!
 * Document translation: placeholder extraction, batch translation and
 * reassembly.
 *
 * - `placeholder`: the `{{ N }}` token codec and numbering prefix matcher
 * - `document`: per-upload document model
 * - `pipeline`: extraction, reassembly and the orchestrator
 * - `batch`: concurrency-bounded translation of extracted items
 * - `core`: provider-backed translation service
 * - `cache`: caching of repeated paragraphs
 */

use async_trait::async_trait;

use crate::errors::TranslationError;

// Re-export main types for easier usage
pub use self::batch::{BatchReport, BatchTranslator};
pub use self::core::TranslationService;
pub use self::document::{DocumentEntity, DocumentItem, TranslationOutcome};
pub use self::pipeline::{DocumentPipeline, FillReport, PipelineReport, TemplateStore, TranslatedDocument};

/// Something that translates one piece of text
///
/// Calls may run concurrently and fail independently.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single extraction unit
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;

    /// Fail fast when the capability cannot be invoked at all
    async fn check_available(&self) -> Result<(), TranslationError> {
        Ok(())
    }

    /// One-line usage statistics for the log, if the translator keeps any
    fn usage_summary(&self) -> Option<String> {
        None
    }
}

// Submodules
pub mod batch;
pub mod cache;
pub mod core;
pub mod document;
pub mod pipeline;
pub mod placeholder;
