use crate::error::{BackendSnafu, Error, PathNotFoundSnafu, Result, ValidationSnafu};
use opendal::layers::{LoggingLayer, TimeoutLayer};
use opendal::{Operator, services};
use snafu::{OptionExt, ensure};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

mod blob;
pub mod constants;
mod operations;
mod partition;
pub mod tree;
pub mod utils;

pub use self::blob::BlobStore;
pub use self::operations::cat::{FileContent, TextFile};
pub use self::operations::list::{Entry, Folder, Listing};
pub use self::operations::upload::{Upload, UploadReceipt, classify_upload};
pub use self::partition::{Partition, PartitionedStore};

use self::operations::cat::PartitionedFileReader;
use self::operations::delete::PartitionedDeleter;
use self::operations::list::TreeLister;
use self::operations::seed::SampleSeeder;
use self::operations::stat::PartitionedStater;
use self::operations::upload::PartitionedUploader;
use self::operations::write::PartitionedWriter;
use self::operations::{Deleter, FileReader, Lister, Seeder, Stater, Uploader, Writer};
use crate::wrap_err;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Fs,
    Memory,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "fs" => Ok(Self::Fs),
            "memory" => Ok(Self::Memory),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Unified storage configuration for different providers
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
    /// Upper bound for a single backend call. Never extended by this crate.
    pub timeout: Option<Duration>,
}

impl StorageConfig {
    fn bare(provider: StorageProvider, bucket: &str) -> Self {
        Self {
            provider,
            bucket: bucket.to_string(),
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: None,
            timeout: None,
        }
    }

    fn credentialed(
        provider: StorageProvider,
        bucket: String,
        key_id: String,
        secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            bucket,
            access_key_id: Some(key_id),
            access_key_secret: Some(secret),
            region,
            ..Self::bare(provider, "")
        }
    }

    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self::credentialed(
            StorageProvider::Oss,
            bucket,
            access_key_id,
            access_key_secret,
            region,
        )
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self::credentialed(
            StorageProvider::S3,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        )
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            root_path: Some(root_path),
            ..Self::bare(StorageProvider::Fs, "local")
        }
    }

    /// Process-local store; contents vanish with the last clone of the client.
    pub fn memory() -> Self {
        Self::bare(StorageProvider::Memory, "memory")
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }
}

/// Flat key-value blob store backed by an OpenDAL operator.
#[derive(Clone)]
pub struct StorageClient {
    operator: Operator,
    provider: StorageProvider,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        Ok(Self {
            operator,
            provider: config.provider,
        })
    }

    pub fn provider(&self) -> StorageProvider {
        self.provider
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        let operator = match config.provider {
            StorageProvider::Oss => Operator::new(oss_builder(config))?.finish(),
            StorageProvider::S3 => Operator::new(s3_builder(config))?.finish(),
            StorageProvider::Fs => {
                let root = config
                    .root_path
                    .as_deref()
                    .unwrap_or(constants::DEFAULT_FS_ROOT);
                Operator::new(services::Fs::default().root(root))?.finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())?.finish(),
        };

        let operator = operator.layer(LoggingLayer::default());
        Ok(match config.timeout {
            Some(timeout) => operator.layer(TimeoutLayer::new().with_timeout(timeout)),
            None => operator,
        })
    }
}

fn oss_builder(config: &StorageConfig) -> services::Oss {
    let mut builder = services::Oss::default().bucket(&config.bucket);
    if let (Some(id), Some(secret)) = (&config.access_key_id, &config.access_key_secret) {
        builder = builder.access_key_id(id).access_key_secret(secret);
    }
    match &config.endpoint {
        Some(endpoint) => builder.endpoint(endpoint),
        None => builder,
    }
}

fn s3_builder(config: &StorageConfig) -> services::S3 {
    let mut builder = services::S3::default().bucket(&config.bucket);
    if let (Some(id), Some(secret)) = (&config.access_key_id, &config.access_key_secret) {
        builder = builder.access_key_id(id).secret_access_key(secret);
    }
    if let Some(region) = &config.region {
        builder = builder.region(region);
    }
    match &config.endpoint {
        Some(endpoint) => builder.endpoint(endpoint),
        None => builder,
    }
}

/// File storage over two partitions of one blob store.
///
/// Every call is independent: nothing is cached between requests, and a
/// listing observes whatever the backend reports at the moment it runs.
#[derive(Clone)]
pub struct StorageService<S> {
    text: PartitionedStore<S>,
    binary: PartitionedStore<S>,
}

impl<S: BlobStore> StorageService<S> {
    pub fn new(store: S) -> Self {
        Self {
            text: PartitionedStore::new(store.clone(), Partition::Text),
            binary: PartitionedStore::new(store, Partition::Binary),
        }
    }

    /// The store holding one partition.
    pub fn partition(&self, partition: Partition) -> &PartitionedStore<S> {
        match partition {
            Partition::Text => &self.text,
            Partition::Binary => &self.binary,
        }
    }

    fn select(&self, binary: bool) -> PartitionedStore<S> {
        self.partition(Partition::from_binary_flag(binary)).clone()
    }

    /// List one directory level across both partitions.
    ///
    /// With `sizes` set, every file at the level is read in full to measure it.
    pub async fn list(&self, path: &str, sizes: bool) -> Result<Listing> {
        log::debug!("list path={path} sizes={sizes}");
        let lister = TreeLister::new(self.text.clone(), self.binary.clone());
        wrap_err!(
            lister.list(path, sizes).await,
            ListDirectoryFailed {
                path: path.to_string()
            }
        )
    }

    pub async fn get_file(&self, path: &str, binary: bool) -> Result<FileContent> {
        log::debug!("get_file path={path} binary={binary}");
        PartitionedFileReader::new(self.select(binary))
            .read(path)
            .await
    }

    /// Create or overwrite a file. Binary content arrives base64 encoded.
    pub async fn create_or_update(&self, path: &str, content: &str, binary: bool) -> Result<()> {
        log::debug!(
            "create_or_update path={path} binary={binary} len={}",
            content.len()
        );
        PartitionedWriter::new(self.select(binary))
            .write(path, content)
            .await
    }

    pub async fn delete_file(&self, path: &str, binary: bool) -> Result<()> {
        log::debug!("delete_file path={path} binary={binary}");
        PartitionedDeleter::new(self.select(binary))
            .delete(path)
            .await
    }

    pub async fn upload(&self, upload: Upload, target_dir: &str) -> Result<UploadReceipt> {
        log::debug!(
            "upload file_name={} content_type={:?} target_dir={target_dir}",
            upload.file_name,
            upload.content_type
        );
        let name = upload.file_name.clone();
        let uploader = PartitionedUploader::new(self.text.clone(), self.binary.clone());
        wrap_err!(
            uploader.upload(upload, target_dir).await,
            UploadFailed {
                file_name: name,
                remote_path: target_dir.to_string()
            }
        )
    }

    /// Upload a file from the local filesystem into `target_dir`.
    pub async fn upload_local(&self, local_path: &Path, target_dir: &str) -> Result<UploadReceipt> {
        let upload = Upload::from_local(local_path).await?;
        self.upload(upload, target_dir).await
    }

    pub async fn stat(&self, path: &str, binary: bool) -> Result<Entry> {
        log::debug!("stat path={path} binary={binary}");
        PartitionedStater::new(self.select(binary)).stat(path).await
    }

    /// Download a stored file to the local filesystem.
    pub async fn get_to_file(&self, path: &str, local_path: &Path, binary: bool) -> Result<()> {
        log::debug!(
            "get_to_file path={path} local_path={} binary={binary}",
            local_path.display()
        );
        let store = self.select(binary);
        match store.lookup(path).await? {
            Some(content) => {
                tokio::fs::write(local_path, content).await?;
                Ok(())
            }
            None => Err(Error::FileNotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Create or replace `path` with the contents of a local file. Text files
    /// must be valid UTF-8; binary files are stored verbatim.
    pub async fn put_local(&self, path: &str, local_path: &Path, binary: bool) -> Result<()> {
        log::debug!(
            "put_local path={path} local_path={} binary={binary}",
            local_path.display()
        );
        ensure!(
            !utils::path::normalize_path(path).is_empty(),
            ValidationSnafu {
                message: "Path parameter is required"
            }
        );
        ensure!(local_path.is_file(), PathNotFoundSnafu { path: local_path });
        if binary {
            ensure!(
                self.binary.create_from_file(path, local_path).await,
                BackendSnafu {
                    operation: "create",
                    path,
                }
            );
            return Ok(());
        }
        let content = tokio::fs::read(local_path).await?;
        let text = String::from_utf8(content).ok().context(ValidationSnafu {
            message: format!("{} is not valid UTF-8 text", local_path.display()),
        })?;
        self.create_or_update(path, &text, false).await
    }

    /// Write the sample data set; returns the number of files written.
    pub async fn seed(&self) -> Result<usize> {
        log::debug!("seed");
        let seeder = SampleSeeder::new(self.text.clone());
        wrap_err!(
            seeder.seed().await,
            SeedFailed {
                path: "data".to_string()
            }
        )
    }
}
