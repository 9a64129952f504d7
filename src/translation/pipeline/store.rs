/*!
 * Directory-backed storage for templates and translated documents.
 *
 * The template reference handed out by [`TemplateStore::save_template`] is a
 * plain file name, so reassembly can reopen the template from another process
 * or at a later time.
 */

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;

use crate::errors::PipelineError;
use crate::file_utils::FileManager;

/// Stores templates and products in two directories
#[derive(Debug, Clone)]
pub struct TemplateStore {
    template_dir: PathBuf,
    product_dir: PathBuf,
}

impl TemplateStore {
    /// Open the store, creating both directories
    pub fn open(template_dir: impl Into<PathBuf>, product_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let store = Self {
            template_dir: template_dir.into(),
            product_dir: product_dir.into(),
        };
        std::fs::create_dir_all(&store.template_dir)?;
        std::fs::create_dir_all(&store.product_dir)?;
        Ok(store)
    }

    /// Directory holding templates
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Directory holding translated documents
    pub fn product_dir(&self) -> &Path {
        &self.product_dir
    }

    /// `<stem>_template_<unix seconds>_<first 8 chars of id>.docx`
    pub fn template_name(original_filename: &str, document_id: &str) -> String {
        let name = FileManager::sanitize_filename(Some(original_filename));
        let stem = Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());
        let id: String = document_id.chars().filter(|c| *c != '-').take(8).collect();

        format!("{}_template_{}_{}.docx", stem, Utc::now().timestamp(), id)
    }

    /// Persist a template and return its reference
    pub async fn save_template(&self, original_filename: &str, document_id: &str, bytes: &[u8]) -> io::Result<String> {
        let reference = Self::template_name(original_filename, document_id);
        tokio::fs::create_dir_all(&self.template_dir).await?;
        tokio::fs::write(self.template_dir.join(&reference), bytes).await?;
        debug!("Stored template {} ({} bytes)", reference, bytes.len());
        Ok(reference)
    }

    /// Read a template back
    pub async fn load_template(&self, reference: &str) -> Result<Vec<u8>, PipelineError> {
        let path = self.template_path(reference);
        tokio::fs::read(&path)
            .await
            .map_err(|source| PipelineError::TemplateNotFound {
                reference: reference.to_string(),
                source,
            })
    }

    /// Remove a template; a missing file is not an error
    pub async fn remove_template(&self, reference: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.template_path(reference)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Persist a translated document under `filename`
    pub async fn save_product(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.product_dir.join(FileManager::sanitize_filename(Some(filename)));
        tokio::fs::create_dir_all(&self.product_dir).await?;
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored translated document {:?}", path);
        Ok(path)
    }

    /// References never leave the template directory
    fn template_path(&self, reference: &str) -> PathBuf {
        self.template_dir.join(FileManager::sanitize_filename(Some(reference)))
    }
}
