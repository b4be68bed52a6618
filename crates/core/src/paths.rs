//! Path resolution and project-boundary checks.
//!
//! Every path admitted into the working file set, and every write or delete
//! target, goes through the functions in this module. The boundary rule is
//! purely lexical: a path is inside the project root when its normalized
//! form, expressed relative to the normalized root, neither starts with a
//! parent-traversal segment nor is absolute.

use std::path::{Component, Path, PathBuf};

/// Resolves a possibly-relative path against the project root.
///
/// Absolute paths pass through (normalized); relative paths are joined to
/// the root first. No file system access is performed.
pub fn resolve_path(path: &str, project_root: &Path) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&project_root.join(candidate))
    }
}

/// Lexically normalizes a path: drops `.` segments and folds `..` into the
/// preceding component where one exists. Does not touch the file system, so
/// symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Computes `path` relative to `base`, lexically. Mirrors the semantics of
/// a relative-path walk: shared prefix components are dropped, remaining
/// `base` components become `..` segments.
pub fn relative_to(base: &Path, path: &Path) -> PathBuf {
    let base = normalize(base);
    let path = normalize(path);

    let base_components: Vec<Component> = base.components().collect();
    let path_components: Vec<Component> = path.components().collect();

    let common = base_components
        .iter()
        .zip(path_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_components.len() {
        out.push("..");
    }
    for component in &path_components[common..] {
        out.push(component.as_os_str());
    }
    out
}

/// True when `path` lies within `project_root`. The check is lexical and
/// never errors: an unresolvable or escaping path is simply outside.
pub fn is_within_root(path: &Path, project_root: &Path) -> bool {
    let relative = relative_to(project_root, path);
    let mut components = relative.components();
    match components.next() {
        Some(Component::ParentDir) => false,
        Some(Component::RootDir) | Some(Component::Prefix(_)) => false,
        _ => true,
    }
}

/// Drops candidates that are already known or that fall outside the project
/// root. Out-of-bounds paths are discarded silently; discovery treats them
/// as not found.
pub fn filter_within_root(
    candidates: Vec<PathBuf>,
    exclude: &[String],
    project_root: &Path,
) -> Vec<PathBuf> {
    candidates
        .into_iter()
        .filter(|path| !exclude.iter().any(|known| Path::new(known) == path.as_path()))
        .filter(|path| is_within_root(path, project_root))
        .collect()
}

/// Renders a path for user-facing output: relative to the root when inside
/// it, unchanged otherwise.
pub fn display_path(path: &Path, project_root: &Path) -> String {
    if is_within_root(path, project_root) {
        relative_to(project_root, path).display().to_string()
    } else {
        path.display().to_string()
    }
}
