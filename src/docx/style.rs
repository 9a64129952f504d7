/*!
 * Run style capture and re-application.
 *
 * A paragraph's formatting is represented by the properties of its first run.
 * Rewriting a paragraph collapses it to one run carrying that style.
 */

use std::fmt;
use std::str::FromStr;

use super::paragraph::{self, RUN_PROPERTIES};
use super::xml::XmlElement;

/// 24-bit RGB color as stored in `w:color`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl FromStr for RgbColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid RGB color: {}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| e.to_string())
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Character formatting carried over from a paragraph's first run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    /// Font family name
    ///
    /// One family per run: read from `w:ascii`, then `w:hAnsi`, then
    /// `w:eastAsia`, and written back to all four `w:rFonts` slots. A run
    /// with separate Latin and East Asian fonts keeps only the first.
    pub font_family: Option<String>,
    /// Font size in points
    pub size_pt: Option<f32>,
    /// Bold; `Some(false)` is an explicit override
    pub bold: Option<bool>,
    /// Italic; `Some(false)` is an explicit override
    pub italic: Option<bool>,
    /// Text color
    pub color: Option<RgbColor>,
}

impl RunStyle {
    /// Read the style of a single run
    pub fn from_run(run: &XmlElement) -> Self {
        let Some(properties) = run.child(RUN_PROPERTIES) else {
            return Self::default();
        };

        let font_family = properties.child("w:rFonts").and_then(|fonts| {
            ["w:ascii", "w:hAnsi", "w:eastAsia"]
                .iter()
                .find_map(|key| fonts.attribute(key))
                .map(str::to_string)
        });

        let size_pt = properties
            .child("w:sz")
            .and_then(|size| size.attribute("w:val"))
            .and_then(|value| value.parse::<u32>().ok())
            .map(|half_points| half_points as f32 / 2.0);

        let color = properties
            .child("w:color")
            .and_then(|color| color.attribute("w:val"))
            .and_then(|value| value.parse::<RgbColor>().ok());

        Self {
            font_family,
            size_pt,
            bold: properties.child("w:b").map(on_off),
            italic: properties.child("w:i").map(on_off),
            color,
        }
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// `w:rPr` element for this style, `None` when nothing is set
    pub fn to_run_properties(&self) -> Option<XmlElement> {
        if self.is_empty() {
            return None;
        }

        let mut properties = XmlElement::new(RUN_PROPERTIES);
        if let Some(family) = &self.font_family {
            properties = properties.with_child(
                XmlElement::new("w:rFonts")
                    .with_attribute("w:ascii", family.as_str())
                    .with_attribute("w:hAnsi", family.as_str())
                    .with_attribute("w:eastAsia", family.as_str())
                    .with_attribute("w:cs", family.as_str()),
            );
        }
        if let Some(bold) = self.bold {
            properties = properties.with_child(toggle("w:b", bold));
        }
        if let Some(italic) = self.italic {
            properties = properties.with_child(toggle("w:i", italic));
        }
        if let Some(color) = self.color {
            properties = properties.with_child(XmlElement::new("w:color").with_attribute("w:val", color.to_string()));
        }
        if let Some(size) = self.size_pt {
            let half_points = (size * 2.0).round() as u32;
            properties = properties
                .with_child(XmlElement::new("w:sz").with_attribute("w:val", half_points.to_string()))
                .with_child(XmlElement::new("w:szCs").with_attribute("w:val", half_points.to_string()));
        }
        Some(properties)
    }
}

fn on_off(element: &XmlElement) -> bool {
    !matches!(element.attribute("w:val"), Some("0" | "false" | "off"))
}

fn toggle(name: &str, value: bool) -> XmlElement {
    let element = XmlElement::new(name);
    if value { element } else { element.with_attribute("w:val", "0") }
}

/// Capture the style of a paragraph's first run; `None` when it has no runs
pub fn capture(paragraph: &XmlElement) -> Option<RunStyle> {
    paragraph::first_run(paragraph).map(RunStyle::from_run)
}

/// Replace the paragraph's content with exactly one run holding `text`
///
/// Existing runs are removed from the tree, not blanked. Without a style the
/// run has no properties and inherits the document defaults.
pub fn apply(paragraph: &mut XmlElement, text: &str, style: Option<&RunStyle>) {
    paragraph::clear(paragraph);
    let run = paragraph::build_run(text, style);
    paragraph.children.push(super::xml::XmlNode::Element(run));
}
