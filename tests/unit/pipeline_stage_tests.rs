/*!
 * Tests for the extraction and reassembly stages
 */

use docxlate::docx::paragraph::runs;
use docxlate::docx::{style, DocxPackage, RgbColor};
use docxlate::translation::pipeline::{extraction, reassembly};
use docxlate::translation::{DocumentItem, TranslationOutcome};

use crate::common;

fn open(body: &str) -> DocxPackage {
    DocxPackage::from_bytes(common::build_docx(body)).unwrap()
}

fn resolve_all(items: &mut [DocumentItem]) {
    for item in items.iter_mut() {
        let translated = format!("ES:{}", item.original_content);
        item.resolve(TranslationOutcome::Translated(translated), "[FAILED]");
    }
}

/// Test that numbers are contiguous and skip empty paragraphs
#[test]
fn test_extract_withEmptyParagraphs_shouldNumberContiguously() {
    let body = format!(
        "{}{}{}{}",
        common::paragraph(&["First"]),
        common::paragraph(&[]),
        common::paragraph(&["  \t "]),
        common::paragraph(&["Second"]),
    );
    let mut document = open(&body);

    let items = extraction::extract(&mut document);

    let numbers: Vec<u64> = items.iter().map(|i| i.placeholder_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(document.paragraph_texts(), vec!["{{ 1 }}", "", "  \t ", "{{ 2 }}"]);
}

/// Test that body paragraphs come before table cells regardless of position
#[test]
fn test_extract_withTableBetweenParagraphs_shouldVisitBodyFirst() {
    let body = format!(
        "{}{}{}",
        common::paragraph(&["Intro"]),
        common::table(&["Name", "Value"]),
        common::paragraph(&["Outro"]),
    );
    let mut document = open(&body);

    let items = extraction::extract(&mut document);

    let contents: Vec<&str> = items.iter().map(|i| i.original_content.as_str()).collect();
    assert_eq!(contents, vec!["Intro", "Outro", "Name", "Value"]);
}

/// Test that fragmented runs collapse into one token run with the first style
#[test]
fn test_extract_withStyledParagraph_shouldKeepFirstRunStyle() {
    let mut document = open(&common::styled_paragraph("Warning"));

    extraction::extract(&mut document);

    let mut checked = false;
    document.for_each_paragraph(|p| {
        assert_eq!(runs(p).len(), 1);
        let captured = style::capture(p).unwrap();
        assert_eq!(captured.font_family.as_deref(), Some("Arial"));
        assert_eq!(captured.bold, Some(true));
        assert_eq!(captured.color, Some(RgbColor(0xFF, 0x00, 0x00)));
        assert_eq!(captured.size_pt, Some(12.0));
        checked = true;
    });
    assert!(checked);
}

/// Test that the numbering prefix stays outside the translation unit
#[test]
fn test_extract_withNumberingPrefix_shouldKeepPrefixInTemplate() {
    let mut document = open(&common::paragraph(&["  2.3.1 Scope of work  "]));

    let items = extraction::extract(&mut document);

    assert_eq!(items[0].original_content, "Scope of work");
    assert_eq!(document.paragraph_texts(), vec!["2.3.1 {{ 1 }}"]);
}

/// Test that non-numeric prefixes are treated as content
#[test]
fn test_extract_withBulletPrefix_shouldTranslateWholeText() {
    let mut document = open(&common::paragraph(&["• Item"]));

    let items = extraction::extract(&mut document);

    assert_eq!(items[0].original_content, "• Item");
    assert_eq!(document.paragraph_texts(), vec!["{{ 1 }}"]);
}

/// Test that extract then fill yields the translations in place
#[test]
fn test_fill_afterExtract_shouldLeaveNoTokens() {
    let body = format!(
        "{}{}{}",
        common::paragraph(&["1 Overview"]),
        common::styled_paragraph("Bold line"),
        common::table(&["Cell"]),
    );
    let mut document = open(&body);
    let mut items = extraction::extract(&mut document);
    resolve_all(&mut items);

    let report = reassembly::fill(&mut document, &items);

    assert_eq!(
        document.paragraph_texts(),
        vec!["1 ES:Overview", "ES:Bold line", "ES:Cell"]
    );
    assert_eq!(report.substituted, 3);
    assert!(report.unknown_placeholders.is_empty());
    assert!(document
        .paragraph_texts()
        .iter()
        .all(|t| !docxlate::translation::placeholder::contains_token(t)));
}

/// Test that reassembly keeps the style captured from the template
#[test]
fn test_fill_withStyledToken_shouldReapplyStyle() {
    let mut document = open(&common::styled_paragraph("{{ 1 }}"));
    let mut items = vec![DocumentItem::new(1, "Hello")];
    resolve_all(&mut items);

    reassembly::fill(&mut document, &items);

    document.for_each_paragraph(|p| {
        let captured = style::capture(p).unwrap();
        assert_eq!(captured.bold, Some(true));
        assert_eq!(captured.color, Some(RgbColor(0xFF, 0x00, 0x00)));
    });
    assert_eq!(document.paragraph_texts(), vec!["ES:Hello"]);
}

/// Test that a token with no item is reported and left in the text
#[test]
fn test_fill_withUnknownToken_shouldReportIt() {
    let mut document = open(&common::paragraph(&["{{ 999 }}"]));

    let report = reassembly::fill(&mut document, &[]);

    assert_eq!(report.unknown_placeholders, vec![999]);
    assert_eq!(report.paragraphs_rewritten, 0);
    assert_eq!(document.paragraph_texts(), vec!["{{ 999 }}"]);
}

/// Test that translated newlines survive as line breaks
#[test]
fn test_fill_withMultilineTranslation_shouldKeepLines() {
    let mut document = open(&common::paragraph(&["{{ 1 }}"]));
    let mut item = DocumentItem::new(1, "a");
    item.resolve(TranslationOutcome::Translated("line one\nline two".to_string()), "[FAILED]");

    reassembly::fill(&mut document, &[item]);

    assert_eq!(document.paragraph_texts(), vec!["line one\nline two"]);
}
