use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::translation::{DocumentPipeline, TranslatedDocument};

// @module: Application controller for document translation

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Written to the contained path
    Translated(PathBuf),

    /// Output already existed and overwriting was not forced
    Skipped(PathBuf),
}

/// Totals of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared document pipeline
    pipeline: Arc<DocumentPipeline>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let pipeline = DocumentPipeline::from_config(&config)?;
        Ok(Self::with_pipeline(config, Arc::new(pipeline)))
    }

    /// Create a controller around an existing pipeline
    pub fn with_pipeline(config: Config, pipeline: Arc<DocumentPipeline>) -> Self {
        Self { config, pipeline }
    }

    /// Translate one document into `output_dir`
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, &output_dir, &multi_progress, force_overwrite)
            .await
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_dir: &Path,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::generate_output_path(input_file, output_dir);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(FileOutcome::Skipped(output_path));
        }
        FileManager::ensure_dir(output_dir)?;

        let bytes = tokio::fs::read(input_file)
            .await
            .with_context(|| format!("Failed to read {:?}", input_file))?;
        let filename = input_file.file_name().map(|n| n.to_string_lossy().to_string());

        info!(
            "🚀 docxlate: {} - {} ({} → {})",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            self.config.source_language,
            self.config.target_language
        );

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(progress_style("paragraphs"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let result = self
            .pipeline
            .process_with_progress(filename.as_deref(), bytes, move |completed, total| {
                pb.set_length(total as u64);
                pb.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let document = result.with_context(|| format!("Failed to translate {:?}", input_file))?;
        self.write_output(&document, &output_path).await?;

        if !document.report.batch.is_complete() {
            warn!(
                "{} paragraphs could not be translated: {:?}",
                document.report.batch.failed.len(),
                document.report.batch.failed
            );
        }
        info!(
            "Translation completed in {}: {:?}",
            Self::format_duration(start_time.elapsed()),
            output_path
        );

        Ok(FileOutcome::Translated(output_path))
    }

    async fn write_output(&self, document: &TranslatedDocument, output_path: &Path) -> Result<()> {
        tokio::fs::write(output_path, &document.bytes)
            .await
            .with_context(|| format!("Failed to write {:?}", output_path))
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Translate every `.docx` below a directory
    ///
    /// Outputs go next to each input unless `output_dir` is given. A failing
    /// file is logged and counted; the run continues with the next one.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool, output_dir: Option<PathBuf>) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_docx_files(&input_dir)?;
        if documents.is_empty() {
            return Err(anyhow!("No .docx files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(documents.len() as u64));
        folder_pb.set_style(progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match (&output_dir, document.parent()) {
                (Some(dir), _) => dir.clone(),
                (None, Some(parent)) => parent.to_path_buf(),
                (None, None) => input_dir.clone(),
            };

            match self
                .run_with_progress(document, &target_dir, &multi_progress, force_overwrite)
                .await
            {
                Ok(FileOutcome::Translated(_)) => summary.processed += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.errors
        );

        Ok(summary)
    }
}

fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        ))
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}
