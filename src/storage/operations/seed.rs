use crate::error::{BackendSnafu, Result};
use crate::storage::{BlobStore, PartitionedStore};
use snafu::ensure;

const SAMPLE_FILES: &[(&str, &str)] = &[
    (
        "data/README.md",
        "# Tools Data Folder\n\nThis folder contains data files used by AI tools.\n\n## Structure\n\n- `/data/config` - Configuration files\n- `/data/temp` - Temporary files\n- `/data/results` - Analysis results",
    ),
    (
        "data/config/settings.json",
        "{\n  \"debug\": true,\n  \"maxThreads\": 4,\n  \"outputPath\": \"./output\",\n  \"defaultLanguage\": \"en-US\"\n}",
    ),
    (
        "data/temp/notes.txt",
        "Temporary notes for the current session.\nThese will be processed and moved to the results folder.",
    ),
    (
        "data/results/analysis.json",
        "{\n  \"status\": \"complete\",\n  \"processingTime\": 2.45,\n  \"itemsProcessed\": 120,\n  \"errorRate\": 0.02\n}",
    ),
    (
        "data/sample.svg",
        r#"<svg width="100" height="100" xmlns="http://www.w3.org/2000/svg">
  <circle cx="50" cy="50" r="40" stroke="green" stroke-width="4" fill="yellow" />
  <text x="50" y="50" font-family="Arial" font-size="12" text-anchor="middle" fill="black">Sample</text>
</svg>"#,
    ),
];

/// Trait for populating storage with a demonstration data set.
pub trait Seeder {
    /// Write the sample files, returning how many were written.
    async fn seed(&self) -> Result<usize>;
}

/// Writes the sample files into the text partition.
pub struct SampleSeeder<S> {
    text: PartitionedStore<S>,
}

impl<S: BlobStore> SampleSeeder<S> {
    pub fn new(text: PartitionedStore<S>) -> Self {
        Self { text }
    }
}

impl<S: BlobStore> Seeder for SampleSeeder<S> {
    async fn seed(&self) -> Result<usize> {
        for (path, content) in SAMPLE_FILES {
            let written = self.text.create(path, *content).await;
            ensure!(
                written,
                BackendSnafu {
                    operation: "create",
                    path: *path
                }
            );
        }
        log::info!("Seeded {} sample files", SAMPLE_FILES.len());
        Ok(SAMPLE_FILES.len())
    }
}
