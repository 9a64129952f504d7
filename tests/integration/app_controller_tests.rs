/*!
 * Tests for the CLI controller over files and folders
 */

use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use docxlate::app_config::Config;
use docxlate::app_controller::{Controller, FileOutcome, FolderSummary};
use docxlate::translation::{DocumentPipeline, TemplateStore};

use crate::common::{self, mock_translators::MockTranslator};

fn controller(store_dir: &TempDir) -> Result<Controller> {
    let store = TemplateStore::open(store_dir.path().join("templates"), store_dir.path().join("products"))?;
    let pipeline = DocumentPipeline::new(Arc::new(MockTranslator::new()), 4, store);
    Ok(Controller::with_pipeline(Config::default(), Arc::new(pipeline)))
}

/// Test that a single file is translated next to the output directory
#[tokio::test]
async fn test_run_withDocument_shouldWriteTranslatedFile() -> Result<()> {
    let store_dir = common::create_temp_dir()?;
    let work_dir = common::create_temp_dir()?;
    let input = common::create_test_file(work_dir.path(), "memo.docx", &common::build_docx(&common::paragraph(&["Hello"])))?;
    let controller = controller(&store_dir)?;

    let outcome = controller.run(input, work_dir.path().join("out"), false).await?;

    let expected = work_dir.path().join("out").join("translated_memo.docx");
    assert_eq!(outcome, FileOutcome::Translated(expected.clone()));
    assert_eq!(common::paragraph_texts(&std::fs::read(expected)?), vec!["ES:Hello"]);
    Ok(())
}

/// Test that existing outputs are kept unless forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let store_dir = common::create_temp_dir()?;
    let work_dir = common::create_temp_dir()?;
    let input = common::create_test_file(work_dir.path(), "memo.docx", &common::build_docx(&common::paragraph(&["Hello"])))?;
    let existing = common::create_test_file(work_dir.path(), "translated_memo.docx", b"old")?;
    let controller = controller(&store_dir)?;

    let skipped = controller.run(input.clone(), work_dir.path().to_path_buf(), false).await?;
    assert_eq!(skipped, FileOutcome::Skipped(existing.clone()));
    assert_eq!(std::fs::read(&existing)?, b"old");

    let forced = controller.run(input, work_dir.path().to_path_buf(), true).await?;
    assert_eq!(forced, FileOutcome::Translated(existing.clone()));
    assert_eq!(common::paragraph_texts(&std::fs::read(&existing)?), vec!["ES:Hello"]);
    Ok(())
}

/// Test that a missing input is an error
#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let store_dir = common::create_temp_dir()?;
    let controller = controller(&store_dir)?;

    let result = tokio_test::block_on(async {
        controller
            .run(store_dir.path().join("missing.docx"), store_dir.path().to_path_buf(), false)
            .await
    });

    assert!(result.is_err());
    Ok(())
}

/// Test that a folder run continues past broken documents
#[tokio::test]
async fn test_run_folder_withBrokenDocument_shouldCountErrorsAndContinue() -> Result<()> {
    let store_dir = common::create_temp_dir()?;
    let work_dir = common::create_temp_dir()?;
    let nested = work_dir.path().join("nested");
    std::fs::create_dir_all(&nested)?;
    common::create_test_file(work_dir.path(), "a.docx", &common::build_docx(&common::paragraph(&["A"])))?;
    common::create_test_file(&nested, "b.docx", &common::build_docx(&common::paragraph(&["B"])))?;
    common::create_test_file(work_dir.path(), "broken.docx", b"not a zip")?;
    let controller = controller(&store_dir)?;

    let summary = controller.run_folder(work_dir.path().to_path_buf(), false, None).await?;

    assert_eq!(summary, FolderSummary { processed: 2, skipped: 0, errors: 1 });
    assert!(nested.join("translated_b.docx").exists());
    assert!(work_dir.path().join("translated_a.docx").exists());

    let again = controller.run_folder(work_dir.path().to_path_buf(), false, None).await?;
    assert_eq!(again, FolderSummary { processed: 0, skipped: 2, errors: 1 });
    Ok(())
}

/// Test that a folder run can collect outputs in one directory
#[tokio::test]
async fn test_run_folder_withOutputDir_shouldWriteThere() -> Result<()> {
    let store_dir = common::create_temp_dir()?;
    let work_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    common::create_test_file(work_dir.path(), "a.docx", &common::build_docx(&common::paragraph(&["A"])))?;
    let controller = controller(&store_dir)?;

    let summary = controller
        .run_folder(work_dir.path().to_path_buf(), false, Some(out_dir.path().to_path_buf()))
        .await?;

    assert_eq!(summary.processed, 1);
    assert!(out_dir.path().join("translated_a.docx").exists());
    Ok(())
}

/// Test that a folder without documents is an error
#[tokio::test]
async fn test_run_folder_withoutDocuments_shouldFail() -> Result<()> {
    let store_dir = common::create_temp_dir()?;
    let work_dir = common::create_temp_dir()?;
    common::create_test_file(work_dir.path(), "notes.txt", b"x")?;
    let controller = controller(&store_dir)?;

    assert!(controller.run_folder(work_dir.path().to_path_buf(), false, None).await.is_err());
    Ok(())
}
