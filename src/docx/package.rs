/*!
 * `.docx` package access.
 *
 * Only the main document part is parsed and rewritten; every other entry of
 * the ZIP package is copied through untouched when the package is saved.
 */

use std::io::{Cursor, Read, Seek, Write};

use bytes::Bytes;
use log::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::paragraph::{self, PARAGRAPH};
use super::xml::{XmlElement, XmlTree};
use crate::errors::DocumentError;

const DEFAULT_MAIN_PART: &str = "word/document.xml";
const PACKAGE_RELATIONSHIPS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_RELATIONSHIP: &str = "/officeDocument";

const BODY: &str = "w:body";
const TABLE: &str = "w:tbl";
const ROW: &str = "w:tr";
const CELL: &str = "w:tc";

/// An opened `.docx` document
#[derive(Debug, Clone)]
pub struct DocxPackage {
    /// Original package bytes, used to copy untouched parts on save
    source: Bytes,
    /// Path of the main document part inside the package
    main_part: String,
    /// Parsed main document part
    document: XmlTree,
}

impl DocxPackage {
    /// Open a document from the bytes of a `.docx` file
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self, DocumentError> {
        let source = bytes.into();
        let mut archive = ZipArchive::new(Cursor::new(source.clone()))?;

        let main_part = resolve_main_part(&mut archive)?;
        let xml = read_part(&mut archive, &main_part)?;
        let document = XmlTree::parse(xml.trim_start_matches('\u{feff}'))?;

        if document.root.child(BODY).is_none() {
            return Err(DocumentError::MissingBody);
        }

        debug!("Opened document package ({} bytes, main part {})", source.len(), main_part);
        Ok(Self { source, main_part, document })
    }

    /// Path of the main document part
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Visit every translatable paragraph in canonical order
    ///
    /// Body paragraphs come first, then each body table row by row, cell by
    /// cell, paragraph by paragraph. Extraction and reassembly both rely on
    /// this order to agree on placeholder numbers.
    pub fn for_each_paragraph_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut XmlElement),
    {
        let Some(body) = self.document.root.child_mut(BODY) else {
            return;
        };

        for paragraph in body.children_named_mut(PARAGRAPH) {
            visit(paragraph);
        }

        for table in body.children_named_mut(TABLE) {
            for row in table.children_named_mut(ROW) {
                for cell in row.children_named_mut(CELL) {
                    for paragraph in cell.children_named_mut(PARAGRAPH) {
                        visit(paragraph);
                    }
                }
            }
        }
    }

    /// Read-only counterpart of [`Self::for_each_paragraph_mut`]
    pub fn for_each_paragraph<F>(&self, mut visit: F)
    where
        F: FnMut(&XmlElement),
    {
        let Some(body) = self.document.root.child(BODY) else {
            return;
        };

        for paragraph in body.children_named(PARAGRAPH) {
            visit(paragraph);
        }

        for table in body.children_named(TABLE) {
            for row in table.children_named(ROW) {
                for cell in row.children_named(CELL) {
                    for paragraph in cell.children_named(PARAGRAPH) {
                        visit(paragraph);
                    }
                }
            }
        }
    }

    /// Plain text of every visited paragraph, in canonical order
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        self.for_each_paragraph(|p| texts.push(paragraph::paragraph_text(p)));
        texts
    }

    /// Serialize the document back into `.docx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let document_xml = self.document.to_bytes()?;
        let mut archive = ZipArchive::new(Cursor::new(self.source.clone()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            if entry.name() == self.main_part {
                let name = entry.name().to_string();
                let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
                writer.start_file(name, options)?;
                writer.write_all(&document_xml)?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String, DocumentError> {
    let mut file = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => DocumentError::MissingPart(name.to_string()),
        other => other.into(),
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

/// Locate the main document part through the package relationships
fn resolve_main_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, DocumentError> {
    let relationships = match read_part(archive, PACKAGE_RELATIONSHIPS) {
        Ok(xml) => xml,
        Err(DocumentError::MissingPart(_)) => return Ok(DEFAULT_MAIN_PART.to_string()),
        Err(e) => return Err(e),
    };

    let tree = XmlTree::parse(relationships.trim_start_matches('\u{feff}'))?;
    let target = tree
        .root
        .elements()
        .filter(|element| element.name.ends_with("Relationship"))
        .find(|element| {
            element
                .attribute("Type")
                .is_some_and(|kind| kind.ends_with(OFFICE_DOCUMENT_RELATIONSHIP))
        })
        .and_then(|element| element.attribute("Target"))
        .map(|target| target.trim_start_matches('/').to_string());

    Ok(target.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
}
