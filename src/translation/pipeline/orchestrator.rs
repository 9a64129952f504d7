/*!
 * Pipeline orchestrator for translating one uploaded document.
 *
 * The orchestrator sequences the three stages:
 * 1. Extraction: templatize the document and store the template
 * 2. Translation: translate the extracted items with bounded concurrency
 * 3. Reassembly: reload the template, fill it and store the product
 */

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, error, info};
use serde::Serialize;

use crate::app_config::Config;
use crate::docx::DocxPackage;
use crate::errors::{DocumentError, PipelineError};
use crate::file_utils::FileManager;
use crate::translation::batch::{BatchReport, BatchTranslator};
use crate::translation::core::TranslationService;
use crate::translation::document::DocumentEntity;
use crate::translation::Translator;

use super::extraction;
use super::reassembly::{self, FillReport};
use super::store::TemplateStore;

/// Statistics for one processed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Translation stage outcome
    pub batch: BatchReport,

    /// Reassembly stage outcome
    pub fill: FillReport,
}

/// A finished translation, ready for download
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    /// Download file name, `translated_<original name>`
    pub filename: String,

    /// The `.docx` bytes
    pub bytes: Vec<u8>,

    /// Stage statistics
    pub report: PipelineReport,
}

/// Extraction, translation and reassembly for uploaded documents
pub struct DocumentPipeline {
    batch: BatchTranslator,
    store: TemplateStore,
}

impl DocumentPipeline {
    /// Create a pipeline around any translator
    pub fn new(translator: Arc<dyn Translator>, concurrency_limit: usize, store: TemplateStore) -> Self {
        Self {
            batch: BatchTranslator::new(translator, concurrency_limit),
            store,
        }
    }

    /// Create the production pipeline from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let service = TranslationService::new(config).context("Failed to create translation service")?;
        info!("Using {}", service.describe());

        let store = TemplateStore::open(&config.storage.template_dir, &config.storage.product_dir)
            .context("Failed to open template store")?;

        let pipeline = Self::new(
            Arc::new(service),
            config.translation.optimal_concurrent_requests(),
            store,
        )
        .with_failure_marker(config.translation.common.failure_marker.clone());

        Ok(pipeline)
    }

    /// Use a different failure marker prefix
    pub fn with_failure_marker(mut self, failure_marker: impl Into<String>) -> Self {
        self.batch = self.batch.with_failure_marker(failure_marker);
        self
    }

    /// The artifact store
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Translate one document
    pub async fn process(&self, original_filename: Option<&str>, bytes: impl Into<Bytes>) -> Result<TranslatedDocument, PipelineError> {
        self.process_with_progress(original_filename, bytes, |_, _| {}).await
    }

    /// Translate one document, reporting `(completed, total)` item progress
    pub async fn process_with_progress<F>(
        &self,
        original_filename: Option<&str>,
        bytes: impl Into<Bytes>,
        progress: F,
    ) -> Result<TranslatedDocument, PipelineError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let start_time = Instant::now();
        let result = self.run_stages(original_filename, bytes.into(), progress).await;

        match &result {
            Ok(document) => info!(
                "Finished {} in {:?}: {}/{} items translated",
                document.filename,
                start_time.elapsed(),
                document.report.batch.translated,
                document.report.batch.total
            ),
            Err(e) => error!("Translation of {:?} failed: {}", original_filename.unwrap_or_default(), e),
        }

        result
    }

    async fn run_stages<F>(&self, original_filename: Option<&str>, bytes: Bytes, progress: F) -> Result<TranslatedDocument, PipelineError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let mut entity = self.extract_content(original_filename, bytes).await?;
        let batch = self.translate(&mut entity, progress).await?;
        let (bytes, fill) = self.fill_template(&entity).await?;

        Ok(TranslatedDocument {
            filename: entity.output_filename(),
            bytes,
            report: PipelineReport { batch, fill },
        })
    }

    /// Extraction stage: build the entity and store its template
    pub async fn extract_content(&self, original_filename: Option<&str>, bytes: Bytes) -> Result<DocumentEntity, PipelineError> {
        let filename = FileManager::sanitize_filename(original_filename);
        let mut entity = DocumentEntity::new(filename);
        info!("Extracting content of {} ({} bytes)", entity.original_filename, bytes.len());

        let (template, items) = run_blocking(move || {
            let mut document = DocxPackage::from_bytes(bytes).map_err(PipelineError::MalformedInput)?;
            let items = extraction::extract(&mut document);
            let template = document.to_bytes().map_err(PipelineError::Output)?;
            Ok((template, items))
        })
        .await?;
        entity.items = items;

        let reference = self
            .store
            .save_template(&entity.original_filename, &entity.id, &template)
            .await?;
        info!("Stored template {} with {} items", reference, entity.items.len());

        entity.template_reference = reference;
        Ok(entity)
    }

    /// Translation stage: resolve every item of the entity
    pub async fn translate<F>(&self, entity: &mut DocumentEntity, progress: F) -> Result<BatchReport, PipelineError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        info!(
            "Translating {} items with up to {} concurrent requests",
            entity.items.len(),
            self.batch.concurrency_limit()
        );
        let report = self.batch.translate_all(&mut entity.items, progress).await?;
        if let Some(summary) = self.batch.usage_summary() {
            debug!("Translator usage after {}: {}", entity.original_filename, summary);
        }
        Ok(report)
    }

    /// Reassembly stage: fill the stored template and store the product
    pub async fn fill_template(&self, entity: &DocumentEntity) -> Result<(Vec<u8>, FillReport), PipelineError> {
        let reference = entity.template_reference.as_str();
        let template = self.store.load_template(reference).await?;

        let owned_reference = reference.to_string();
        let items = entity.items.clone();
        let (bytes, report) = run_blocking(move || {
            let mut document = DocxPackage::from_bytes(template).map_err(|e| PipelineError::TemplateNotFound {
                reference: owned_reference,
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
            let report = reassembly::fill(&mut document, &items);
            let bytes = document.to_bytes().map_err(PipelineError::Output)?;
            Ok((bytes, report))
        })
        .await?;

        let path = self.store.save_product(&entity.output_filename(), &bytes).await?;
        info!(
            "Reassembled {} ({} substitutions) into {:?}",
            entity.original_filename, report.substituted, path
        );

        Ok((bytes, report))
    }
}

/// Run CPU-bound package work off the async workers
async fn run_blocking<T, F>(work: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PipelineError::Output(DocumentError::Worker(e.to_string())))?
}
