use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used by the outer surfaces to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Backend,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Invalid value '{value}' for '{key}'"))]
    InvalidConfig { key: String, value: String },

    #[snafu(display("File not found: {path}"))]
    FileNotFound { path: String },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("{message}"))]
    Validation { message: String },

    #[snafu(display("Invalid base64 encoding: {source}"))]
    InvalidBase64 { source: base64::DecodeError },

    #[snafu(display("Storage backend failed to {operation} '{path}'"))]
    Backend { operation: String, path: String },

    #[snafu(display("Failed to list directory '{path}': {source}"))]
    ListDirectoryFailed { path: String, source: Box<Error> },

    #[snafu(display("Failed to upload '{file_name}' to '{remote_path}': {source}"))]
    UploadFailed {
        file_name: String,
        remote_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to seed sample data at '{path}': {source}"))]
    SeedFailed { path: String, source: Box<Error> },

    #[snafu(display("Serialization error: {source}"))]
    Serialization { source: serde_json::Error },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl Error {
    /// Classify the error, looking through contextual wrappers to the root cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound { .. } | Error::PathNotFound { .. } => ErrorKind::NotFound,
            Error::Validation { .. } | Error::InvalidBase64 { .. } => ErrorKind::Validation,
            Error::ListDirectoryFailed { source, .. }
            | Error::UploadFailed { source, .. }
            | Error::SeedFailed { source, .. } => source.kind(),
            Error::OpenDal { source } if source.kind() == opendal::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Backend,
        }
    }
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization { source: error }
    }
}
