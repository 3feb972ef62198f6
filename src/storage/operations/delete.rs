// Delete operation trait and implementation
use crate::error::{BackendSnafu, FileNotFoundSnafu, Result, ValidationSnafu};
use crate::storage::utils::path::normalize_path;
use crate::storage::{BlobStore, PartitionedStore};
use snafu::ensure;

/// Trait for deleting a file from one partition.
pub trait Deleter {
    /// Delete the file at `path`.
    ///
    /// # Returns
    /// * `Result<()>` - `FileNotFound` when nothing is stored at `path`
    async fn delete(&self, path: &str) -> Result<()>;
}

pub struct PartitionedDeleter<S> {
    store: PartitionedStore<S>,
}

impl<S: BlobStore> PartitionedDeleter<S> {
    pub fn new(store: PartitionedStore<S>) -> Self {
        Self { store }
    }
}

impl<S: BlobStore> Deleter for PartitionedDeleter<S> {
    async fn delete(&self, path: &str) -> Result<()> {
        ensure!(
            !normalize_path(path).is_empty(),
            ValidationSnafu {
                message: "Path parameter is required"
            }
        );
        // Object stores accept deletes of missing keys, so check first.
        ensure!(
            self.store.lookup(path).await?.is_some(),
            FileNotFoundSnafu { path }
        );
        ensure!(
            self.store.delete(path).await,
            BackendSnafu {
                operation: "delete",
                path
            }
        );
        Ok(())
    }
}
