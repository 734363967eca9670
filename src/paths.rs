//! Path handling behind the `state:makePath` and `state:mapPath` features.
//!
//! Paths are abstracted relative to the bridge's working directory. Inputs
//! already in the requested form are passed through.

use std::path::{Component, Path, PathBuf};

/// Absolute location for `path`, creating its parent directory.
///
/// Returns `None` for an empty path.
pub fn make_path(cwd: &Path, path: &str) -> Option<PathBuf> {
    if path.is_empty() {
        return None;
    }

    let full = absolute_path(cwd, path);
    if let Some(parent) = full.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::warn!("Failed to create {}: {}", parent.display(), e);
        }
    }

    Some(full)
}

/// Turn an absolute path into one relative to `cwd`.
///
/// Empty input gives an empty path, relative input is returned unchanged.
pub fn abstract_path(cwd: &Path, absolute: &str) -> PathBuf {
    if absolute.is_empty() {
        return PathBuf::new();
    }

    let path = Path::new(absolute);
    if !path.is_absolute() {
        return path.to_path_buf();
    }

    relative_to(path, cwd)
}

/// Turn a path relative to `cwd` into an absolute one.
///
/// Empty input gives `cwd` itself, absolute input is returned unchanged.
pub fn absolute_path(cwd: &Path, abstract_path: &str) -> PathBuf {
    if abstract_path.is_empty() {
        return cwd.to_path_buf();
    }

    let path = Path::new(abstract_path);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    cwd.join(path)
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path: Vec<Component<'_>> = path.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Different roots (e.g. another drive): nothing to abstract.
    if common == 0 {
        return path.iter().collect();
    }

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component.as_os_str());
    }
    relative
}
