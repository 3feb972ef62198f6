// Utilities for storage module
pub mod error;
pub mod mime;
pub mod path;
pub mod size;

/// Output format for CLI commands that can render machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human friendly multi-line output
    Human,
    /// Pretty-printed JSON output
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }
}
