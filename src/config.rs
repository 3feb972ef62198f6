use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::storage::constants::DEFAULT_FS_ROOT;
use crate::storage::{StorageConfig, StorageProvider};

const DEFAULT_OSS_ENDPOINT: &str = "https://oss-cn-hangzhou.aliyuncs.com";
const DEFAULT_MINIO_ENDPOINT: &str = "http://localhost:9000";

/// First of `keys` that is set in the environment.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

fn require_env(keys: &[&str]) -> Result<String> {
    first_env(keys).ok_or_else(|| Error::MissingEnvVar {
        key: keys.join(" or "),
    })
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_name = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "fs".to_string());
    let provider = StorageProvider::from_str(&provider_name)?;

    let mut config = match provider {
        StorageProvider::Oss => load_oss_config()?,
        StorageProvider::S3 if provider_name.eq_ignore_ascii_case("minio") => load_minio_config()?,
        StorageProvider::S3 => load_s3_config()?,
        StorageProvider::Fs => StorageConfig::fs(
            first_env(&["STORAGE_ROOT_PATH"]).unwrap_or_else(|| DEFAULT_FS_ROOT.to_string()),
        ),
        StorageProvider::Memory => StorageConfig::memory(),
    };
    config.timeout = load_timeout()?;
    Ok(config)
}

/// Optional per-request backend timeout, in seconds.
fn load_timeout() -> Result<Option<Duration>> {
    let Some(value) = first_env(&["STORAGE_TIMEOUT_SECS"]) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|_| Error::InvalidConfig {
            key: "STORAGE_TIMEOUT_SECS".to_string(),
            value,
        })
}

/// Alibaba Cloud OSS.
fn load_oss_config() -> Result<StorageConfig> {
    let config = StorageConfig::oss(
        require_env(&["STORAGE_BUCKET", "OSS_BUCKET"])?,
        require_env(&["STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID"])?,
        require_env(&["STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET"])?,
        first_env(&["STORAGE_REGION", "OSS_REGION"]),
    );
    let endpoint = first_env(&["STORAGE_ENDPOINT", "OSS_ENDPOINT"])
        .unwrap_or_else(|| DEFAULT_OSS_ENDPOINT.to_string());
    Ok(config.with_endpoint(Some(endpoint)))
}

/// AWS S3; the endpoint is only set when overridden.
fn load_s3_config() -> Result<StorageConfig> {
    let config = StorageConfig::s3(
        require_env(&["STORAGE_BUCKET", "AWS_S3_BUCKET"])?,
        require_env(&["STORAGE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"])?,
        require_env(&["STORAGE_ACCESS_KEY_SECRET", "AWS_SECRET_ACCESS_KEY"])?,
        first_env(&["STORAGE_REGION", "AWS_DEFAULT_REGION"]),
    );
    Ok(config.with_endpoint(first_env(&["STORAGE_ENDPOINT"])))
}

/// MinIO speaks the S3 protocol against a local endpoint by default.
fn load_minio_config() -> Result<StorageConfig> {
    let config = StorageConfig::s3(
        require_env(&["STORAGE_BUCKET", "MINIO_BUCKET"])?,
        require_env(&["STORAGE_ACCESS_KEY_ID", "MINIO_ACCESS_KEY"])?,
        require_env(&["STORAGE_ACCESS_KEY_SECRET", "MINIO_SECRET_KEY"])?,
        first_env(&["STORAGE_REGION", "MINIO_DEFAULT_REGION"]),
    );
    let endpoint = first_env(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"])
        .unwrap_or_else(|| DEFAULT_MINIO_ENDPOINT.to_string());
    Ok(config.with_endpoint(Some(endpoint)))
}
