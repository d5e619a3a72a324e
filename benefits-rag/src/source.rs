//! Document sources: where the corpus text comes from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::{RagError, Result};

/// A readable collection of documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load every document, in a stable order.
    async fn load(&self) -> Result<Vec<Document>>;
}

/// Documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: Vec<Document>,
}

impl StaticSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn load(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

/// Reads every `*.pdf` file directly inside a folder, sorted by file name.
///
/// Text is extracted page by page with `lopdf`. A page without extractable
/// text contributes nothing; a file that cannot be parsed is logged and
/// skipped so one broken PDF does not keep the service from starting.
#[derive(Debug, Clone)]
pub struct PdfDirectorySource {
    folder: PathBuf,
}

impl PdfDirectorySource {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self { folder: folder.into() }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn pdf_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.folder).map_err(|e| RagError::DocumentError {
            path: self.folder.clone(),
            message: format!("cannot read folder: {e}"),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "pdf"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn load_blocking(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for path in self.pdf_paths()? {
            match read_pdf(&path) {
                Ok(document) => {
                    debug!(document = %document.id, pages = document.pages, chars = document.text.len(), "read pdf");
                    documents.push(document);
                }
                Err(e) => warn!(error = %e, "skipping unreadable pdf"),
            }
        }
        info!(folder = %self.folder.display(), documents = documents.len(), "loaded documents");
        Ok(documents)
    }
}

fn read_pdf(path: &Path) -> Result<Document> {
    let pdf = lopdf::Document::load(path).map_err(|e| RagError::DocumentError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let page_map = pdf.get_pages();
    let pages = page_map.keys().map(|&page| pdf.extract_text(&[page]).unwrap_or_default());

    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Ok(Document::from_pages(name, pages))
}

#[async_trait]
impl DocumentSource for PdfDirectorySource {
    async fn load(&self) -> Result<Vec<Document>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.load_blocking()).await.map_err(|e| {
            RagError::DocumentError { path: self.folder.clone(), message: format!("loader task failed: {e}") }
        })?
    }
}
