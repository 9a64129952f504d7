/*!
 * Extraction stage: turn a document into a placeholder template.
 *
 * Every non-empty paragraph, in canonical walk order, gets the next
 * placeholder number. Its text is replaced by `{{ N }}` (after any numbering
 * prefix) in a single run carrying the paragraph's first-run style.
 */

use log::{debug, info};

use crate::docx::paragraph::paragraph_text;
use crate::docx::{style, DocxPackage, XmlElement};
use crate::translation::document::DocumentItem;
use crate::translation::placeholder;

/// Hands out placeholder numbers `1, 2, 3, ...` for one extraction
#[derive(Debug)]
struct PlaceholderCounter {
    next: u64,
}

impl PlaceholderCounter {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn take(&mut self) -> u64 {
        let number = self.next;
        self.next += 1;
        number
    }
}

/// Templatize a document in place and return the extracted items
///
/// Items are numbered contiguously from 1 in walk order.
pub fn extract(document: &mut DocxPackage) -> Vec<DocumentItem> {
    let mut counter = PlaceholderCounter::new();
    let mut items = Vec::new();

    document.for_each_paragraph_mut(|paragraph| {
        if let Some(item) = templatize_paragraph(paragraph, &mut counter) {
            items.push(item);
        }
    });

    info!("Extracted {} translatable paragraphs", items.len());
    items
}

fn templatize_paragraph(paragraph: &mut XmlElement, counter: &mut PlaceholderCounter) -> Option<DocumentItem> {
    let text = paragraph_text(paragraph);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (prefix, content) = placeholder::match_numbering_prefix(trimmed).unwrap_or(("", trimmed));
    let number = counter.take();

    let captured = style::capture(paragraph);
    let templated = format!("{}{}", prefix, placeholder::encode(number));
    style::apply(paragraph, &templated, captured.as_ref());

    debug!("Paragraph {} -> {:?}", number, templated);
    Some(DocumentItem::new(number, content))
}
