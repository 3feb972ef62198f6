//! Virtual directory tree over flat keys.
//!
//! Only leaf files are stored. Directories are implied by the keys nested
//! beneath them and disappear as soon as the last such key is removed.

use crate::storage::utils::path::{components, parent_path};
use std::collections::{BTreeMap, BTreeSet};

/// Files grouped by parent directory, plus every directory the paths imply.
#[derive(Debug, Default, Clone)]
pub struct PathIndex {
    files: BTreeMap<String, BTreeSet<String>>,
    directories: BTreeSet<String>,
}

/// The immediate contents of one directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Level {
    pub files: Vec<String>,
    pub folders: Vec<String>,
}

impl PathIndex {
    pub fn build<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut index = Self::default();
        for path in paths {
            index.insert(path.as_ref());
        }
        index
    }

    fn insert(&mut self, path: &str) {
        let parts = components(path);
        let Some((leaf, parents)) = parts.split_last() else {
            return;
        };

        for depth in 1..=parents.len() {
            self.directories.insert(parents[..depth].join("/"));
        }
        self.files
            .entry(parents.join("/"))
            .or_default()
            .insert(leaf.to_string());
    }

    /// Names of the files stored directly in `dir`.
    pub fn files_in(&self, dir: &str) -> impl Iterator<Item = &str> {
        self.files
            .get(dir)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Every strict prefix directory of every indexed path.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.directories.iter().map(String::as_str)
    }

    /// Names of the folders exactly one level below `dir`.
    pub fn child_folders(&self, dir: &str) -> Vec<String> {
        self.directories
            .iter()
            .filter(|candidate| parent_path(candidate).as_deref() == Some(dir))
            .filter_map(|candidate| components(candidate).last().map(|name| name.to_string()))
            .collect()
    }

    /// Files and folders directly inside `dir`, which must already be normalized.
    pub fn resolve(&self, dir: &str) -> Level {
        Level {
            files: self.files_in(dir).map(str::to_string).collect(),
            folders: self.child_folders(dir),
        }
    }
}
