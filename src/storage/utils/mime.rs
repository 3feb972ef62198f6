// Extension-based file metadata
use super::path::extension;
use crate::storage::constants::DEFAULT_MIME_TYPE;

const MIME_TYPES: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
    ("toml", "application/toml"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("py", "text/x-python"),
    ("rs", "text/x-rust"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
    ("wasm", "application/wasm"),
];

// Extensions always stored in the binary partition when an upload is classified.
const BINARY_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "ico", "svg", "pdf", "zip", "gz", "tar", "7z",
    "bin",
];

/// MIME type derived from the path's extension.
pub fn mime_type(path: &str) -> &'static str {
    extension(path)
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Whether the extension marks the file as binary. Says nothing about where
/// an existing file is stored; partition membership comes from its key alone.
pub fn is_binary_extension(path: &str) -> bool {
    extension(path).is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether a declared content type allows the upload to be stored as text.
pub fn is_textual_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.starts_with("text/") || content_type.starts_with("application/json")
}
