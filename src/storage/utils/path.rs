// Logical path helpers. Paths are '/'-delimited; empty components are ignored.

/// Split a logical path into its non-empty components.
pub fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

/// Canonical form of a logical path: no leading, trailing or doubled slashes.
pub fn normalize_path(path: &str) -> String {
    components(path).join("/")
}

/// Parent of a logical path. The root has no parent; a single component's parent is the root.
pub fn parent_path(path: &str) -> Option<String> {
    let parts = components(path);
    match parts.split_last() {
        None => None,
        Some((_, parent)) => Some(parent.join("/")),
    }
}

/// Join a directory and a child name, treating an empty directory as the root.
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = normalize_path(dir);
    let name = normalize_path(name);
    match (dir.is_empty(), name.is_empty()) {
        (true, _) => name,
        (_, true) => dir,
        _ => format!("{dir}/{name}"),
    }
}

/// Last component of a logical path.
pub fn basename(path: &str) -> String {
    components(path).last().map(|s| s.to_string()).unwrap_or_default()
}

/// Lower-cased extension of the last component, without the dot.
pub fn extension(path: &str) -> Option<String> {
    let name = basename(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
