use crate::error::{FileNotFoundSnafu, Result};
use crate::storage::utils::mime::mime_type;
use crate::storage::utils::path::{basename, normalize_path};
use crate::storage::{BlobStore, Entry, PartitionedStore};
use snafu::OptionExt;

/// Trait for fetching the derived metadata of one file.
pub trait Stater {
    /// Fetch metadata for a single file.
    ///
    /// # Arguments
    /// * `path` - File path to query
    ///
    /// # Returns
    /// * `Result<Entry>` - Name, size, MIME type and partition of the file
    async fn stat(&self, path: &str) -> Result<Entry>;
}

#[derive(Clone)]
pub struct PartitionedStater<S> {
    store: PartitionedStore<S>,
}

impl<S: BlobStore> PartitionedStater<S> {
    pub fn new(store: PartitionedStore<S>) -> Self {
        Self { store }
    }
}

impl<S: BlobStore> Stater for PartitionedStater<S> {
    /// Nothing but the content is stored, so the size comes from a full read.
    async fn stat(&self, path: &str) -> Result<Entry> {
        let content = self
            .store
            .lookup(path)
            .await?
            .context(FileNotFoundSnafu { path })?;

        Ok(Entry {
            name: basename(path),
            full_path: normalize_path(path),
            size_bytes: content.len() as u64,
            mime_type: mime_type(path).to_string(),
            partition: self.store.partition(),
        })
    }
}
