use crate::error::{BackendSnafu, InvalidBase64Snafu, Result, ValidationSnafu};
use crate::storage::utils::path::{components, normalize_path};
use crate::storage::{BlobStore, PartitionedStore};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use snafu::{ResultExt, ensure};

/// Trait for creating or replacing a file in one partition.
pub trait Writer {
    /// Store `content` at `path`.
    ///
    /// # Arguments
    /// * `path` - Logical file path; must name a file, not the root
    /// * `content` - Text, or base64 text when writing to the binary partition
    async fn write(&self, path: &str, content: &str) -> Result<()>;
}

pub struct PartitionedWriter<S> {
    store: PartitionedStore<S>,
}

impl<S: BlobStore> PartitionedWriter<S> {
    pub fn new(store: PartitionedStore<S>) -> Self {
        Self { store }
    }

    /// Bytes to store, decoding base64 for the binary partition before any backend call.
    fn decode(&self, content: &str) -> Result<Vec<u8>> {
        if self.store.partition().is_binary() {
            // Line-wrapped (MIME style) base64 is accepted.
            let compact: String = content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            STANDARD.decode(compact).context(InvalidBase64Snafu)
        } else {
            Ok(content.as_bytes().to_vec())
        }
    }

    /// First ancestor of `path` that is itself a stored file.
    async fn file_ancestor(&self, path: &str) -> Option<String> {
        let parts = components(path);
        for end in 1..parts.len() {
            let ancestor = parts[..end].join("/");
            if let Ok(Some(_)) = self.store.lookup(&ancestor).await {
                return Some(ancestor);
            }
        }
        None
    }
}

impl<S: BlobStore> Writer for PartitionedWriter<S> {
    async fn write(&self, path: &str, content: &str) -> Result<()> {
        ensure!(
            !normalize_path(path).is_empty(),
            ValidationSnafu {
                message: "Path parameter is required"
            }
        );
        let bytes = self.decode(content)?;

        if self.store.create(path, bytes).await {
            return Ok(());
        }
        // Directory-backed stores cannot hold a file and a folder under one name.
        if let Some(ancestor) = self.file_ancestor(path).await {
            return ValidationSnafu {
                message: format!("Cannot store '{path}': '{ancestor}' is already a file"),
            }
            .fail();
        }
        BackendSnafu {
            operation: "create",
            path,
        }
        .fail()
    }
}
