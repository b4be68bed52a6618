//! File-set expansion from intent signals.
//!
//! Two independent sources feed discovery: explicit paths named by the
//! intent, and free-text hints reduced to search terms. Both are bounded by
//! the project root; an out-of-bounds candidate is treated as not found,
//! never as an error.

use crate::search::ContentSearch;
use regex::Regex;
use spindle_core::paths;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Generic words that make useless search terms. Quoted substrings bypass
/// this list.
const BROAD_TERMS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "these", "those", "its", "are", "was",
    "been", "should", "would", "could", "will", "can", "not", "all", "any", "some", "new", "old",
    "add", "remove", "update", "change", "fix", "make", "use", "create", "delete", "implement",
    "refactor", "file", "files", "code", "codebase", "system", "systems", "component",
    "components", "module", "modules", "function", "functions", "method", "methods", "class",
    "classes", "variable", "variables", "project", "app", "application", "logic", "feature",
    "features", "support", "error", "errors", "line", "lines", "block", "blocks", "user", "users",
    "data", "value", "values", "name", "names", "type", "types", "need", "needs", "want", "like",
    "please", "then", "when", "where", "how", "what", "which", "why", "into", "within", "across",
    "also", "more", "most", "other", "existing", "current", "given", "each", "only", "just",
    "ensure", "main",
];

const MIN_TERM_LEN: usize = 3;

/// Resolves explicit intent paths against the root, dropping anything
/// already known or outside the boundary.
pub fn discover_from_paths(
    file_paths: &[String],
    existing_paths: &[String],
    project_root: &Path,
) -> Vec<PathBuf> {
    if file_paths.is_empty() {
        return Vec::new();
    }

    let resolved: Vec<PathBuf> = file_paths
        .iter()
        .map(|path| paths::resolve_path(path, project_root))
        .collect();

    paths::filter_within_root(resolved, existing_paths, project_root)
}

/// Reduces free-text hints to search terms and runs the content search.
/// Contributes nothing when no usable terms remain, when the search times
/// out, or when it fails.
pub async fn discover_from_search_terms(
    hints: &[String],
    existing_paths: &[String],
    project_root: &Path,
    search: &ContentSearch,
    max_files_per_term: usize,
) -> Vec<PathBuf> {
    let mut terms = Vec::new();
    for hint in hints {
        terms.extend(extract_terms(hint));
    }
    dedupe_preserving_order(&mut terms);

    if terms.is_empty() {
        return Vec::new();
    }

    debug!(terms = ?terms, "Searching with extracted terms");

    let candidates = search.search(&terms, project_root).await;
    let mut within = paths::filter_within_root(candidates, existing_paths, project_root);
    within.truncate(terms.len() * max_files_per_term);
    within
}

/// Reduces one free-text hint to keyword-like tokens: quoted substrings are
/// kept verbatim, the rest is split on non-word characters and run through
/// the broad-term filter.
pub fn extract_terms(hint: &str) -> Vec<String> {
    let quoted_re = Regex::new(r#""([^"]+)"|'([^']+)'"#).unwrap();

    let mut terms = Vec::new();
    for captures in quoted_re.captures_iter(hint) {
        if let Some(quoted) = captures.get(1).or_else(|| captures.get(2)) {
            let quoted = quoted.as_str().trim();
            if !quoted.is_empty() {
                terms.push(quoted.to_string());
            }
        }
    }

    let unquoted = quoted_re.replace_all(hint, " ");
    for token in unquoted.split(|c: char| !c.is_alphanumeric() && c != '_') {
        if token.len() < MIN_TERM_LEN {
            continue;
        }
        if BROAD_TERMS.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        terms.push(token.to_string());
    }

    dedupe_preserving_order(&mut terms);
    terms
}

fn dedupe_preserving_order(terms: &mut Vec<String>) {
    let mut seen = HashSet::new();
    terms.retain(|term| seen.insert(term.to_lowercase()));
}
