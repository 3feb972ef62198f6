use crate::error::Result;
use crate::storage::BlobStore;
use crate::storage::constants::{BINARY_PREFIX, TEXT_PREFIX};
use crate::storage::utils::path::normalize_path;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// One of the two logical namespaces sharing the underlying key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Text,
    Binary,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Text, Partition::Binary];

    pub fn from_binary_flag(binary: bool) -> Self {
        if binary { Self::Binary } else { Self::Text }
    }

    pub fn is_binary(self) -> bool {
        self == Self::Binary
    }

    /// Key prefix under which this partition's files are stored.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Text => TEXT_PREFIX,
            Self::Binary => BINARY_PREFIX,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.pad("text"),
            Self::Binary => f.pad("binary"),
        }
    }
}

/// A view of the blob store restricted to one partition's prefix.
///
/// Backend failures stop here: every operation except [`lookup`](Self::lookup)
/// reports them as `false` or `None` after logging what went wrong.
#[derive(Clone)]
pub struct PartitionedStore<S> {
    store: S,
    partition: Partition,
}

impl<S: BlobStore> PartitionedStore<S> {
    pub fn new(store: S, partition: Partition) -> Self {
        Self { store, partition }
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    fn key(&self, path: &str) -> String {
        format!("{}{}", self.partition.prefix(), normalize_path(path))
    }

    /// Write `content` at `path`, overwriting whatever was there.
    pub async fn create(&self, path: &str, content: impl Into<Vec<u8>>) -> bool {
        let key = self.key(path);
        match self.store.put(&key, content.into()).await {
            Ok(()) => {
                log::info!("Stored {} file: {path}", self.partition);
                true
            }
            Err(e) => {
                log::error!("Error storing {} file {path}: {e}", self.partition);
                false
            }
        }
    }

    /// Object stores have no patch or append, so an update is a full overwrite.
    pub async fn update(&self, path: &str, content: impl Into<Vec<u8>>) -> bool {
        self.create(path, content).await
    }

    /// Read `path`, keeping a missing key apart from a failing backend.
    pub async fn lookup(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(&self.key(path)).await
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        match self.lookup(path).await {
            Ok(Some(content)) => Some(content),
            Ok(None) => {
                log::info!("No {} file at {path}", self.partition);
                None
            }
            Err(e) => {
                log::error!("Error retrieving {} file {path}: {e}", self.partition);
                None
            }
        }
    }

    /// Read `path` as UTF-8. Content that does not decode is reported as absent.
    pub async fn get_text(&self, path: &str) -> Option<String> {
        let content = self.get(path).await?;
        match String::from_utf8(content) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("File {path} is not valid UTF-8: {e}");
                None
            }
        }
    }

    pub async fn get_json(&self, path: &str) -> Option<serde_json::Value> {
        let text = self.get_text(path).await?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("Error parsing JSON file {path}: {e}");
                None
            }
        }
    }

    pub async fn create_json(&self, path: &str, value: &serde_json::Value) -> bool {
        match serde_json::to_string_pretty(value) {
            Ok(text) => self.create(path, text).await,
            Err(e) => {
                log::error!("Error serializing JSON for {path}: {e}");
                false
            }
        }
    }

    pub async fn update_json(&self, path: &str, value: &serde_json::Value) -> bool {
        self.create_json(path, value).await
    }

    pub async fn delete(&self, path: &str) -> bool {
        match self.store.delete(&self.key(path)).await {
            Ok(()) => {
                log::info!("Deleted {} file: {path}", self.partition);
                true
            }
            Err(e) => {
                log::error!("Error deleting {} file {path}: {e}", self.partition);
                false
            }
        }
    }

    /// Logical paths of every file in this partition, in backend order.
    pub async fn list_files(&self) -> Vec<String> {
        let prefix = self.partition.prefix();
        match self.store.list().await {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|key| key.strip_prefix(prefix).map(str::to_string))
                .filter(|path| !path.is_empty())
                .collect(),
            Err(e) => {
                log::error!("Error listing {} files: {e}", self.partition);
                Vec::new()
            }
        }
    }

    /// Copy a stored file to the local filesystem.
    pub async fn get_to_file(&self, path: &str, local_path: &Path) -> bool {
        let Some(content) = self.get(path).await else {
            return false;
        };
        match tokio::fs::write(local_path, content).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error writing {path} to {}: {e}", local_path.display());
                false
            }
        }
    }

    /// Store the contents of a local file at `path`.
    pub async fn create_from_file(&self, path: &str, local_path: &Path) -> bool {
        match tokio::fs::read(local_path).await {
            Ok(content) => self.create(path, content).await,
            Err(e) => {
                log::error!("Error reading {}: {e}", local_path.display());
                false
            }
        }
    }
}
