/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;

use anyhow::Result;
use docxlate::file_utils::FileManager;

use crate::common;

/// Test that file_exists distinguishes files from missing paths and directories
#[test]
fn test_file_exists_withVariousPaths_shouldOnlyAcceptFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.docx", b"x")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists("non_existent_file.docx"));
    Ok(())
}

/// Test that user supplied names lose directory components
#[test]
fn test_sanitize_filename_withPaths_shouldKeepBaseName() {
    assert_eq!(FileManager::sanitize_filename(Some("report.docx")), "report.docx");
    assert_eq!(FileManager::sanitize_filename(Some("../../etc/report.docx")), "report.docx");
    assert_eq!(FileManager::sanitize_filename(Some("C:\\Users\\me\\notes.docx")), "notes.docx");
}

/// Test the fallback name for absent or empty names
#[test]
fn test_sanitize_filename_withMissingName_shouldUseDefault() {
    assert_eq!(FileManager::sanitize_filename(None), "uploaded.docx");
    assert_eq!(FileManager::sanitize_filename(Some("")), "uploaded.docx");
    assert_eq!(FileManager::sanitize_filename(Some("dir/")), "uploaded.docx");
    assert_eq!(FileManager::sanitize_filename(Some("..")), "uploaded.docx");
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(Path::new("/tmp/input/report.docx"), Path::new("/tmp/output"));

    assert_eq!(output_path, Path::new("/tmp/output/translated_report.docx"));
}

/// Test which files a folder run picks up
#[test]
fn test_is_translatable_docx_withVariousNames_shouldSkipLocksAndOutputs() {
    assert!(FileManager::is_translatable_docx("a/report.docx"));
    assert!(FileManager::is_translatable_docx("a/REPORT.DOCX"));
    assert!(!FileManager::is_translatable_docx("a/~$report.docx"));
    assert!(!FileManager::is_translatable_docx("a/translated_report.docx"));
    assert!(!FileManager::is_translatable_docx("a/report.doc"));
    assert!(!FileManager::is_translatable_docx("a/report.docx.bak"));
}

/// Test recursive discovery of documents
#[test]
fn test_find_docx_files_withNestedDirs_shouldReturnSortedDocuments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(temp_dir.path(), "b.docx", b"x")?;
    common::create_test_file(&nested, "a.docx", b"x")?;
    common::create_test_file(temp_dir.path(), "~$b.docx", b"x")?;
    common::create_test_file(temp_dir.path(), "translated_b.docx", b"x")?;
    common::create_test_file(temp_dir.path(), "notes.txt", b"x")?;

    let files = FileManager::find_docx_files(temp_dir.path())?;

    assert_eq!(files, vec![temp_dir.path().join("b.docx"), nested.join("a.docx")]);
    Ok(())
}

/// Test that ensure_dir creates nested directories and tolerates existing ones
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("x").join("y");

    FileManager::ensure_dir(&path)?;
    FileManager::ensure_dir(&path)?;

    assert!(fs::metadata(&path)?.is_dir());
    Ok(())
}
