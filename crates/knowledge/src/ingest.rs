//! Document ingestion.
//!
//! Reads text files from a data directory and splits them into chunks on
//! blank lines.

use crate::types::Document;
use sentra_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Separator between chunks inside a file.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Supplies the documents an index is built from.
pub trait DocumentSource: Send + Sync {
    fn load_documents(&self) -> AppResult<Vec<Document>>;
}

/// Loads `*.txt` (or other configured extensions) from the top level of a
/// directory.
#[derive(Debug, Clone)]
pub struct DirectoryIngestor {
    data_dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryIngestor {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            extensions: vec!["txt".to_string()],
        }
    }

    /// Replace the accepted file extensions (without the leading dot).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

impl DocumentSource for DirectoryIngestor {
    fn load_documents(&self) -> AppResult<Vec<Document>> {
        if !self.data_dir.is_dir() {
            return Err(AppError::Knowledge(format!(
                "Data directory does not exist: {}",
                self.data_dir.display()
            )));
        }

        let mut documents = Vec::new();
        let mut counter = 0usize;

        for entry in WalkDir::new(&self.data_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                AppError::Knowledge(format!(
                    "Failed to read data directory {}: {}",
                    self.data_dir.display(),
                    e
                ))
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !self.accepts(path) {
                continue;
            }

            let bytes = std::fs::read(path).map_err(|e| {
                AppError::Knowledge(format!("Failed to read {}: {}", path.display(), e))
            })?;
            if bytes.is_empty() {
                tracing::debug!("Skipping empty file {}", path.display());
                continue;
            }

            let content = String::from_utf8_lossy(&bytes);
            let source = path.display().to_string();
            let before = documents.len();

            for chunk in split_chunks(&content) {
                documents.push(Document::new(format!("doc-{}", counter), &source, chunk));
                counter += 1;
            }

            tracing::debug!(
                "Loaded {} chunks from {}",
                documents.len() - before,
                source
            );
        }

        tracing::info!(
            "Loaded {} documents from {}",
            documents.len(),
            self.data_dir.display()
        );
        Ok(documents)
    }
}

/// Split text on blank lines, dropping empty pieces.
pub fn split_chunks(content: &str) -> impl Iterator<Item = &str> {
    content
        .split(CHUNK_SEPARATOR)
        .filter(|chunk| !chunk.is_empty())
}
