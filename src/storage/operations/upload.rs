use crate::error::{BackendSnafu, PathNotFoundSnafu, Result, ValidationSnafu};
use crate::storage::utils::mime::{is_binary_extension, is_textual_content_type};
use crate::storage::utils::path::{components, join_path};
use crate::storage::{BlobStore, Partition, PartitionedStore};
use serde::Serialize;
use snafu::ensure;
use std::path::Path;
use tokio::fs;

/// Trait for storing an uploaded file, choosing its partition from the file itself.
pub trait Uploader {
    /// Store `upload` inside `target_dir`.
    ///
    /// # Arguments
    /// * `upload` - The file name, declared content type and bytes
    /// * `target_dir` - Directory to place the file in; the empty string is the root
    ///
    /// # Returns
    /// * `Result<UploadReceipt>` - Where the file landed
    async fn upload(&self, upload: Upload, target_dir: &str) -> Result<UploadReceipt>;
}

/// An incoming file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            content: content.into(),
        }
    }

    /// Read a local file; local files carry no declared content type.
    pub async fn from_local(local_path: &Path) -> Result<Self> {
        ensure!(
            local_path.is_file(),
            PathNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );
        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = fs::read(local_path).await?;
        Ok(Self::new(file_name, None, content))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub path: String,
    pub partition: Partition,
    pub size: u64,
}

/// Pick the partition for an upload.
///
/// The declared content type is consulted first, then the extension allowlist,
/// then whether the bytes decode as UTF-8. The first check that decides on
/// binary is final.
pub fn classify_upload(file_name: &str, content_type: Option<&str>, content: &[u8]) -> Partition {
    if let Some(content_type) = content_type.filter(|ct| !ct.trim().is_empty()) {
        if !is_textual_content_type(content_type) {
            return Partition::Binary;
        }
    }
    if is_binary_extension(file_name) {
        return Partition::Binary;
    }
    match std::str::from_utf8(content) {
        Ok(_) => Partition::Text,
        Err(_) => Partition::Binary,
    }
}

pub struct PartitionedUploader<S> {
    text: PartitionedStore<S>,
    binary: PartitionedStore<S>,
}

impl<S: BlobStore> PartitionedUploader<S> {
    pub fn new(text: PartitionedStore<S>, binary: PartitionedStore<S>) -> Self {
        Self { text, binary }
    }
}

impl<S: BlobStore> Uploader for PartitionedUploader<S> {
    async fn upload(&self, upload: Upload, target_dir: &str) -> Result<UploadReceipt> {
        // Only the final component of a client-supplied name is trusted.
        let file_name = components(&upload.file_name)
            .last()
            .map(|name| name.to_string())
            .unwrap_or_default();
        ensure!(
            !file_name.is_empty(),
            ValidationSnafu {
                message: "Uploaded file has no name"
            }
        );

        let path = join_path(target_dir, &file_name);
        let partition = classify_upload(
            &file_name,
            upload.content_type.as_deref(),
            &upload.content,
        );
        let store = match partition {
            Partition::Text => &self.text,
            Partition::Binary => &self.binary,
        };

        let size = upload.content.len() as u64;
        ensure!(
            store.create(&path, upload.content).await,
            BackendSnafu {
                operation: "upload",
                path: path.clone()
            }
        );
        log::info!("Uploaded {file_name} to {partition} partition at {path}");

        Ok(UploadReceipt {
            path,
            partition,
            size,
        })
    }
}
