use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Name used when an upload carries no usable file name
pub const DEFAULT_UPLOAD_NAME: &str = "uploaded.docx";

/// Prefix of translated document names
pub const TRANSLATED_PREFIX: &str = "translated_";

/// Prefix Word uses for lock files next to open documents
const LOCK_FILE_PREFIX: &str = "~$";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Base name of a user supplied file name
    ///
    /// Directory components (either separator) are dropped; an empty result
    /// falls back to [`DEFAULT_UPLOAD_NAME`].
    pub fn sanitize_filename(name: Option<&str>) -> String {
        let base = name
            .unwrap_or_default()
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        if base.is_empty() || base == "." || base == ".." {
            DEFAULT_UPLOAD_NAME.to_string()
        } else {
            base.to_string()
        }
    }

    /// File name of the translated version of `original_filename`
    pub fn translated_filename(original_filename: &str) -> String {
        format!("{}{}", TRANSLATED_PREFIX, Self::sanitize_filename(Some(original_filename)))
    }

    // @generates: Output path for a translated document
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2) -> PathBuf {
        let name = input_file
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        output_dir.as_ref().join(Self::translated_filename(name.as_deref().unwrap_or_default()))
    }

    /// Whether a path names a translatable `.docx` file
    ///
    /// Word lock files and documents this tool already produced are skipped.
    pub fn is_translatable_docx<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        let has_docx_extension = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("docx"));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        has_docx_extension && !name.starts_with(LOCK_FILE_PREFIX) && !name.starts_with(TRANSLATED_PREFIX)
    }

    /// Find translatable `.docx` files below a directory, sorted by path
    pub fn find_docx_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_translatable_docx(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }
}
