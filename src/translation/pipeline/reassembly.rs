/*!
 * Reassembly stage: substitute translations into a template.
 *
 * Paragraphs are scanned for `{{ N }}` tokens. Known tokens are replaced by
 * the item's translation (or failure marker) and the paragraph is rewritten as
 * a single run in its captured style. Unknown tokens stay in the text.
 */

use std::collections::HashMap;

use log::{debug, warn};
use serde::Serialize;

use crate::docx::paragraph::paragraph_text;
use crate::docx::{style, DocxPackage, XmlElement};
use crate::translation::document::DocumentItem;
use crate::translation::placeholder;

/// What a fill pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    /// Paragraphs rewritten with translated text
    pub paragraphs_rewritten: usize,

    /// Tokens replaced by item content
    pub substituted: usize,

    /// Tokens with no matching item, in walk order
    pub unknown_placeholders: Vec<u64>,
}

/// Substitute every resolvable token in the template
pub fn fill(template: &mut DocxPackage, items: &[DocumentItem]) -> FillReport {
    let lookup: HashMap<u64, &str> = items
        .iter()
        .map(|item| (item.placeholder_number, item.replacement()))
        .collect();
    let mut report = FillReport::default();

    template.for_each_paragraph_mut(|paragraph| fill_paragraph(paragraph, &lookup, &mut report));

    if !report.unknown_placeholders.is_empty() {
        warn!(
            "Template contains {} placeholders with no matching item: {:?}",
            report.unknown_placeholders.len(),
            report.unknown_placeholders
        );
    }
    debug!(
        "Rewrote {} paragraphs ({} substitutions)",
        report.paragraphs_rewritten, report.substituted
    );
    report
}

fn fill_paragraph(paragraph: &mut XmlElement, lookup: &HashMap<u64, &str>, report: &mut FillReport) {
    let text = paragraph_text(paragraph);
    let tokens = placeholder::decode_all(&text);
    if tokens.is_empty() {
        return;
    }

    let mut rewritten = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut substituted = 0;

    for (span, number) in tokens {
        rewritten.push_str(&text[cursor..span.start]);
        match lookup.get(&number) {
            Some(replacement) => {
                rewritten.push_str(replacement);
                substituted += 1;
            }
            None => {
                rewritten.push_str(&text[span.clone()]);
                report.unknown_placeholders.push(number);
            }
        }
        cursor = span.end;
    }
    rewritten.push_str(&text[cursor..]);

    if substituted == 0 {
        return;
    }

    let captured = style::capture(paragraph);
    style::apply(paragraph, &rewritten, captured.as_ref());
    report.paragraphs_rewritten += 1;
    report.substituted += substituted;
}
