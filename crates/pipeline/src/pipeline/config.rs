use spindle_core::SpindleConfig;

const DEFAULT_MAX_FILES_PER_TERM: usize = 5;
const DEFAULT_MAX_SEARCH_FILES: usize = 50;

/// Bounds on discovery and tree generation for one run.
#[derive(Debug, Clone)]
pub struct PipelineLimits {
    /// Ceiling on term-based discovery results, per extracted term.
    pub max_files_per_term: usize,
    /// Overall ceiling on content-search results.
    pub max_search_files: usize,
    /// File cap for the rendered project tree.
    pub tree_max_files: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_files_per_term: DEFAULT_MAX_FILES_PER_TERM,
            max_search_files: DEFAULT_MAX_SEARCH_FILES,
            tree_max_files: 100,
        }
    }
}

impl PipelineLimits {
    pub fn from_config(config: &SpindleConfig) -> Self {
        Self {
            tree_max_files: config.tree_max_files,
            ..Self::default()
        }
    }
}
