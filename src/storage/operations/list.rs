use crate::error::Result;
use crate::storage::constants::SIZE_FETCH_CONCURRENCY;
use crate::storage::tree::PathIndex;
use crate::storage::utils::mime::mime_type;
use crate::storage::utils::path::{join_path, normalize_path, parent_path};
use crate::storage::{BlobStore, Partition, PartitionedStore};
use futures::stream::{self, StreamExt};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Trait for listing one level of the virtual directory tree.
pub trait Lister {
    /// List the files and folders directly inside `path`.
    ///
    /// # Arguments
    /// * `path` - Directory path to list; the empty string is the root
    /// * `sizes` - Whether to measure each file by reading it in full
    ///
    /// # Returns
    /// * `Result<Listing>` - The level's contents across both partitions
    async fn list(&self, path: &str, sizes: bool) -> Result<Listing>;
}

/// A stored file, derived on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "path")]
    pub full_path: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    pub mime_type: String,
    #[serde(rename = "is_binary", serialize_with = "serialize_is_binary")]
    pub partition: Partition,
}

fn serialize_is_binary<S: Serializer>(
    partition: &Partition,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_bool(partition.is_binary())
}

/// A folder that exists only because files are nested beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub files: Vec<Entry>,
    pub folders: Vec<Folder>,
    pub current_path: String,
    pub parent_path: Option<String>,
}

/// Lists both partitions and merges them into one level.
pub struct TreeLister<S> {
    text: PartitionedStore<S>,
    binary: PartitionedStore<S>,
}

impl<S: BlobStore> TreeLister<S> {
    pub fn new(text: PartitionedStore<S>, binary: PartitionedStore<S>) -> Self {
        Self { text, binary }
    }

    /// Size of a file as its full content length.
    ///
    /// There is no stored size metadata, so this costs one complete read. At
    /// most `SIZE_FETCH_CONCURRENCY` reads run at once. A file removed after
    /// the key snapshot was taken reports zero.
    async fn measure(store: PartitionedStore<S>, path: String) -> u64 {
        match store.get(&path).await {
            Some(content) => content.len() as u64,
            None => {
                log::warn!(
                    "Could not read {} file {path} for its size, reporting 0",
                    store.partition()
                );
                0
            }
        }
    }
}

impl<S: BlobStore> Lister for TreeLister<S> {
    async fn list(&self, path: &str, sizes: bool) -> Result<Listing> {
        let current_path = normalize_path(path);
        let mut folders = BTreeSet::new();
        let mut found = Vec::new();

        for store in [&self.text, &self.binary] {
            let index = PathIndex::build(store.list_files().await);
            let level = index.resolve(&current_path);
            folders.extend(level.folders);
            found.extend(level.files.into_iter().map(|name| (store.clone(), name)));
        }

        let pending: Vec<_> = found
            .into_iter()
            .map(|(store, name)| {
                let full_path = join_path(&current_path, &name);
                async move {
                    let size_bytes = if sizes {
                        Self::measure(store.clone(), full_path.clone()).await
                    } else {
                        0
                    };
                    Entry {
                        mime_type: mime_type(&full_path).to_string(),
                        name,
                        full_path,
                        size_bytes,
                        partition: store.partition(),
                    }
                }
            })
            .collect();

        let mut files: Vec<Entry> = stream::iter(pending)
            .buffered(SIZE_FETCH_CONCURRENCY)
            .collect()
            .await;
        files.sort_by(|a, b| (&a.name, a.partition).cmp(&(&b.name, b.partition)));

        let folders = folders
            .into_iter()
            .map(|name| Folder {
                path: join_path(&current_path, &name),
                name,
            })
            .collect();

        Ok(Listing {
            files,
            folders,
            parent_path: parent_path(&current_path),
            current_path,
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} {:>10} {:<6} {}",
            "FILE",
            crate::storage::utils::size::format_size(self.size_bytes),
            self.partition,
            self.name
        )
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {:>10} {:<6} {}/", "DIR", "-", "", self.name)
    }
}
