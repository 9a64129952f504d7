/*!
 * Paragraph-level access to WordprocessingML.
 *
 * Reading walks runs in document order, descending through the containers Word
 * wraps runs in (hyperlinks, tracked insertions, content controls). Writing
 * collapses the paragraph to a single run.
 */

use super::style::RunStyle;
use super::xml::{XmlElement, XmlNode};

pub const PARAGRAPH: &str = "w:p";
pub const PARAGRAPH_PROPERTIES: &str = "w:pPr";
pub const RUN: &str = "w:r";
pub const RUN_PROPERTIES: &str = "w:rPr";
pub const TEXT: &str = "w:t";

/// Elements that may hold runs inside a paragraph
const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:ins",
    "w:moveTo",
    "w:smartTag",
    "w:fldSimple",
    "w:customXml",
    "w:sdt",
    "w:sdtContent",
    "w:bdo",
    "w:dir",
];

/// Plain text of a paragraph, as a reader would see it
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut text = String::new();
    for run in runs(paragraph) {
        push_run_text(run, &mut text);
    }
    text
}

/// All runs of a paragraph in document order
pub fn runs(paragraph: &XmlElement) -> Vec<&XmlElement> {
    let mut found = Vec::new();
    collect_runs(paragraph, &mut found);
    found
}

/// The first run of a paragraph, if any
pub fn first_run(paragraph: &XmlElement) -> Option<&XmlElement> {
    runs(paragraph).into_iter().next()
}

fn collect_runs<'a>(element: &'a XmlElement, found: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        if child.is(RUN) {
            found.push(child);
        } else if RUN_CONTAINERS.contains(&child.name.as_str()) {
            collect_runs(child, found);
        }
    }
}

fn push_run_text(run: &XmlElement, text: &mut String) {
    for child in run.elements() {
        match child.name.as_str() {
            TEXT => text.push_str(&child.text_content()),
            "w:tab" => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
}

/// Remove all paragraph content except its properties
pub fn clear(paragraph: &mut XmlElement) {
    paragraph.children.retain(|node| {
        matches!(node, XmlNode::Element(element) if element.is(PARAGRAPH_PROPERTIES))
    });
}

/// Build a run holding `text`, formatted with `style` when given
pub fn build_run(text: &str, style: Option<&RunStyle>) -> XmlElement {
    let mut run = XmlElement::new(RUN);
    if let Some(properties) = style.and_then(RunStyle::to_run_properties) {
        run = run.with_child(properties);
    }

    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\n' | '\t' => {
                flush_text(&mut run, &mut segment);
                let name = if ch == '\n' { "w:br" } else { "w:tab" };
                run = run.with_child(XmlElement::new(name));
            }
            '\r' => {}
            ch if !is_xml_char(ch) => {}
            _ => segment.push(ch),
        }
    }
    flush_text(&mut run, &mut segment);
    run
}

/// Whether XML 1.0 allows `ch` in character data
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn flush_text(run: &mut XmlElement, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    let text = XmlElement::new(TEXT)
        .with_attribute("xml:space", "preserve")
        .with_text(std::mem::take(segment));
    run.children.push(XmlNode::Element(text));
}
