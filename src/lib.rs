/*!
 * # docxlate - Word document translation with AI
 *
 * A Rust library for translating `.docx` documents paragraph by paragraph
 * while keeping their layout.
 *
 * ## Features
 *
 * - Placeholder templating of body paragraphs and table cells
 * - Numbering prefixes (`2.3.1 `) kept outside the translated text
 * - Run style (font, size, bold, italic, color) carried over to translations
 * - Bounded concurrent translation with per-paragraph failure isolation
 * - Translation providers:
 *   - Ollama (local LLM)
 *   - OpenAI API
 *   - LM Studio (OpenAI-compatible local server)
 * - CLI and HTTP upload service
 *
 * ## Architecture
 *
 * - `docx`: `.docx` package, paragraph and run style handling
 * - `translation`: the document pipeline:
 *   - `translation::placeholder`: `{{ N }}` token codec
 *   - `translation::pipeline`: extraction, reassembly, template store, orchestrator
 *   - `translation::batch`: bounded concurrent translation of items
 *   - `translation::core`: provider-backed translation service
 *   - `translation::cache`: caching of repeated paragraphs
 * - `providers`: HTTP clients for LLM providers
 * - `app_config`: configuration management
 * - `app_controller`: CLI workflow over files and folders
 * - `server`: HTTP upload/download boundary
 * - `file_utils`, `language_utils`: file system and ISO 639 helpers
 * - `errors`: error types for every layer
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod docx;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod server;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use docx::DocxPackage;
pub use errors::{DocumentError, PipelineError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, normalize_to_part2t, validate_language_code};
pub use translation::{DocumentPipeline, TranslatedDocument, TranslationService, Translator};
