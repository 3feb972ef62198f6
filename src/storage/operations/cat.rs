use crate::error::{Error, Result};
use crate::storage::utils::mime::mime_type;
use crate::storage::utils::path::basename;
use crate::storage::{BlobStore, PartitionedStore};
use serde::Serialize;

/// Trait for reading a single file from one partition.
pub trait FileReader {
    async fn read(&self, path: &str) -> Result<FileContent>;
}

/// Text file as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFile {
    pub name: String,
    pub content: String,
    pub mime_type: String,
    pub is_binary: bool,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(TextFile),
    Binary { mime_type: String, content: Vec<u8> },
}

impl FileContent {
    pub fn mime_type(&self) -> &str {
        match self {
            FileContent::Text(file) => &file.mime_type,
            FileContent::Binary { mime_type, .. } => mime_type,
        }
    }

    /// Raw stored bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FileContent::Text(file) => file.content.into_bytes(),
            FileContent::Binary { content, .. } => content,
        }
    }
}

/// Reads files from a single partition.
pub struct PartitionedFileReader<S> {
    store: PartitionedStore<S>,
}

impl<S: BlobStore> PartitionedFileReader<S> {
    pub fn new(store: PartitionedStore<S>) -> Self {
        Self { store }
    }

    fn not_found(path: &str) -> Error {
        Error::FileNotFound {
            path: path.to_string(),
        }
    }
}

impl<S: BlobStore> FileReader for PartitionedFileReader<S> {
    async fn read(&self, path: &str) -> Result<FileContent> {
        let content = self
            .store
            .lookup(path)
            .await?
            .ok_or_else(|| Self::not_found(path))?;
        let mime_type = mime_type(path).to_string();

        if self.store.partition().is_binary() {
            return Ok(FileContent::Binary { mime_type, content });
        }

        // Undecodable text is surfaced as absent rather than as a failure.
        let content = String::from_utf8(content).map_err(|e| {
            log::warn!("Text file {path} is not valid UTF-8: {e}");
            Self::not_found(path)
        })?;

        Ok(FileContent::Text(TextFile {
            name: basename(path),
            size: content.len() as u64,
            content,
            mime_type,
            is_binary: false,
        }))
    }
}
