/*!
 * Document translation pipeline.
 *
 * A document moves through three stages:
 * 1. **Extraction**: paragraphs become `{{ N }}` placeholders in a stored template
 * 2. **Translation**: extracted items are translated with bounded concurrency
 * 3. **Reassembly**: the template is reloaded and placeholders are filled
 */

pub mod extraction;
pub mod orchestrator;
pub mod reassembly;
pub mod store;

// Re-export types used externally
pub use orchestrator::{DocumentPipeline, PipelineReport, TranslatedDocument};
pub use reassembly::FillReport;
pub use store::TemplateStore;
