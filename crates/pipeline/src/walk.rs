//! Shared directory-walk configuration for the search and tree services.

use ignore::{Walk, WalkBuilder};
use std::path::Path;

/// Build and dependency directories that never contribute source files.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "coverage",
];

/// Walker over a project root that skips hidden entries, the excluded
/// directories, and does not honor VCS ignore files (untracked sources
/// still count).
pub fn source_walker(root: &Path) -> Walk {
    WalkBuilder::new(root)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .hidden(true)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !EXCLUDED_DIRS.contains(&name.as_ref())
        })
        .build()
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}
