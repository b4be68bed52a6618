//! Whole-word content search over the project's source files.
//!
//! This is the text-search collaborator: bounded by a hard timeout, scoped
//! to source-like extensions, and silent about failures. Anything that goes
//! wrong, including the deadline expiring, yields an empty result rather
//! than an error.

use crate::walk::{has_extension, source_walker};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SEARCH_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];
const MAX_FILE_SIZE_BYTES: u64 = 1_048_576;

pub struct ContentSearch {
    timeout: Duration,
    max_results: usize,
}

impl ContentSearch {
    pub fn new(timeout: Duration, max_results: usize) -> Self {
        Self {
            timeout,
            max_results,
        }
    }

    /// Returns absolute paths of files containing any of `terms` as a whole
    /// word. Empty on timeout, walk failure, or an empty term list.
    pub async fn search(&self, terms: &[String], root: &Path) -> Vec<PathBuf> {
        if terms.is_empty() {
            return Vec::new();
        }

        let pattern = build_pattern(terms);
        let regex = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Search pattern failed to compile");
                return Vec::new();
            }
        };

        debug!(pattern = %pattern, root = %root.display(), "Search");

        let root = root.to_path_buf();
        let deadline = Instant::now() + self.timeout;
        let max_results = self.max_results;

        let task =
            tokio::task::spawn_blocking(move || search_blocking(&regex, &root, deadline, max_results));

        match task.await {
            Ok(Some(paths)) => paths,
            Ok(None) => {
                warn!("Search timed out");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Search task failed");
                Vec::new()
            }
        }
    }
}

/// Alternation of escaped terms, matched on word boundaries.
fn build_pattern(terms: &[String]) -> String {
    let escaped: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
    format!(r"\b({})\b", escaped.join("|"))
}

/// Walks the tree collecting matching files. `None` signals the deadline
/// expired before the walk finished.
fn search_blocking(
    regex: &Regex,
    root: &Path,
    deadline: Instant,
    max_results: usize,
) -> Option<Vec<PathBuf>> {
    let mut matches = Vec::new();

    for entry in source_walker(root) {
        if Instant::now() >= deadline {
            return None;
        }

        let Ok(entry) = entry else { continue };
        let path = entry.path();

        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if !has_extension(path, SEARCH_EXTENSIONS) {
            continue;
        }
        if entry
            .metadata()
            .map(|m| m.len() > MAX_FILE_SIZE_BYTES)
            .unwrap_or(true)
        {
            continue;
        }

        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };

        if regex.is_match(&content) {
            matches.push(path.to_path_buf());
            if matches.len() >= max_results {
                break;
            }
        }
    }

    matches.sort();
    Some(matches)
}
