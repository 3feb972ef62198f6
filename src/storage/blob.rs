use crate::error::Result;
use crate::storage::StorageClient;
use std::future::Future;

/// The four primitives of a flat key-value blob store.
///
/// Keys are opaque strings. A missing key on `get` is `Ok(None)`, never an
/// error, so callers can tell absence apart from a failing backend.
pub trait BlobStore: Clone + Send + Sync + 'static {
    /// Write `content` at `key`, replacing any previous value.
    fn put(&self, key: &str, content: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Remove `key`. Removing a key that does not exist succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Every stored key, in backend order.
    fn list(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

impl BlobStore for StorageClient {
    async fn put(&self, key: &str, content: Vec<u8>) -> Result<()> {
        self.operator().write(key, content).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.operator().read(key).await {
            Ok(buffer) => Ok(Some(buffer.to_vec())),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(None),
            // Hierarchical backends keep implied folders as real directories.
            Err(e) => match self.operator().stat(key).await {
                Ok(meta) if meta.is_dir() => Ok(None),
                _ => Err(e.into()),
            },
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.operator().delete(key).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        // Directory entries only show up on hierarchical backends; keep leaf objects.
        let entries = self.operator().list_with("/").recursive(true).await?;
        Ok(entries
            .into_iter()
            .map(|entry| entry.path().to_string())
            .filter(|path| !path.is_empty() && !path.ends_with('/'))
            .collect())
    }
}
