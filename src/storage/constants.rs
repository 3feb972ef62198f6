// Partition key prefixes in the shared key space
pub const TEXT_PREFIX: &str = "text/";
pub const BINARY_PREFIX: &str = "binary/";

// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";

// HTTP server defaults
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const MAX_UPLOAD_SIZE: usize = 64 * 1024 * 1024;

// Upper bound on file reads in flight while measuring a listing
pub const SIZE_FETCH_CONCURRENCY: usize = 16;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
