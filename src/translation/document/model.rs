/*!
 * Core document model types for document translation.
 *
 * A `DocumentEntity` lives for one pipeline run: extraction creates it, the
 * translation stage fills each item, reassembly reads it.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::file_utils::FileManager;

/// One extraction unit: the text of a paragraph behind a placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
    /// 1-based number written into the template as `{{ N }}`
    pub placeholder_number: u64,

    /// Paragraph text with any numbering prefix removed
    pub original_content: String,

    /// Translation, or a failure marker; `None` until the translation stage ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_content: Option<String>,
}

impl DocumentItem {
    /// Create an untranslated item
    pub fn new(placeholder_number: u64, original_content: impl Into<String>) -> Self {
        Self {
            placeholder_number,
            original_content: original_content.into(),
            translated_content: None,
        }
    }

    /// Record the outcome of translating this item
    ///
    /// Failures become `"<marker> <reason>"` so they stay visible in the output.
    pub fn resolve(&mut self, outcome: TranslationOutcome, failure_marker: &str) {
        self.translated_content = Some(match outcome {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Failed(reason) => format!("{} {}", failure_marker, reason),
        });
    }

    /// Whether the translation stage resolved this item
    pub fn is_resolved(&self) -> bool {
        self.translated_content.is_some()
    }

    /// Text to substitute for this item's placeholder
    pub fn replacement(&self) -> &str {
        self.translated_content.as_deref().unwrap_or("")
    }
}

/// Result of translating a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// The translator returned text
    Translated(String),
    /// The translator failed or panicked; carries the reason
    Failed(String),
}

/// One uploaded document for the duration of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntity {
    /// Traceability id, generated per upload
    pub id: String,

    /// File name of the upload, without directory components
    pub original_filename: String,

    /// Name of the stored template the reassembly stage reopens
    pub template_reference: String,

    /// Extracted items in placeholder order
    pub items: Vec<DocumentItem>,
}

impl DocumentEntity {
    /// Create an entity with a fresh id and no items
    pub fn new(original_filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_filename: original_filename.into(),
            template_reference: String::new(),
            items: Vec::new(),
        }
    }

    /// File name of the translated document
    pub fn output_filename(&self) -> String {
        FileManager::translated_filename(&self.original_filename)
    }

    /// Look up an item by placeholder number
    ///
    /// Items are numbered `1..=N` in order, so this is an index lookup.
    pub fn item(&self, placeholder_number: u64) -> Option<&DocumentItem> {
        let index = usize::try_from(placeholder_number.checked_sub(1)?).ok()?;
        self.items
            .get(index)
            .filter(|item| item.placeholder_number == placeholder_number)
    }

    /// Whether every item has a translation or failure marker
    pub fn is_fully_resolved(&self) -> bool {
        self.items.iter().all(DocumentItem::is_resolved)
    }
}
