//! The mutable record threaded through every phase of one request.

use super::config::PipelineLimits;
use crate::search::ContentSearch;
use crate::semantic::SemanticParser;
use spindle_core::model::{ApplyResult, Change, FileRecord, Intent};
use spindle_core::{FileSystem, ProgressHandler};
use spindle_llm::CodeAssistant;
use std::path::PathBuf;
use std::sync::Arc;

/// Long-lived collaborators a run borrows.
pub struct PipelineServices {
    pub assistant: Arc<CodeAssistant>,
    pub fs: Arc<dyn FileSystem>,
    pub search: Arc<ContentSearch>,
    pub parser: Arc<SemanticParser>,
    pub progress: Arc<dyn ProgressHandler>,
}

/// Owned by exactly one pipeline invocation; created per request and
/// dropped when the run returns.
pub struct PipelineContext {
    /// The request, immutable for the run.
    pub user_prompt: String,
    /// Seed paths as given on the command line, immutable.
    pub initial_file_paths: Vec<String>,
    /// Working file set. Grows monotonically; the read phase replaces a
    /// record's path with its resolved form on first successful read.
    pub files: Vec<FileRecord>,
    /// Security boundary for every path operation.
    pub project_root: PathBuf,
    /// Rendered project tree; stays `None` when generation fails.
    pub project_tree: Option<String>,
    /// Placeholder until the intent phase overwrites it, exactly once.
    pub intent: Intent,
    /// Empty until the change-generation phase.
    pub changes: Vec<Change>,
    /// Set only on the ask branch.
    pub answer: Option<String>,
    /// Append-only audit trail of file-system effects.
    pub result: ApplyResult,

    pub assistant: Arc<CodeAssistant>,
    pub fs: Arc<dyn FileSystem>,
    pub search: Arc<ContentSearch>,
    pub parser: Arc<SemanticParser>,
    pub progress: Arc<dyn ProgressHandler>,
    pub limits: PipelineLimits,
}

impl PipelineContext {
    pub fn new(
        user_prompt: impl Into<String>,
        initial_file_paths: Vec<String>,
        project_root: PathBuf,
        services: PipelineServices,
        limits: PipelineLimits,
    ) -> Self {
        let files = initial_file_paths
            .iter()
            .cloned()
            .map(FileRecord::new)
            .collect();

        Self {
            user_prompt: user_prompt.into(),
            initial_file_paths,
            files,
            project_root,
            project_tree: None,
            intent: Intent::placeholder(),
            changes: Vec::new(),
            answer: None,
            result: ApplyResult::default(),
            assistant: services.assistant,
            fs: services.fs,
            search: services.search,
            parser: services.parser,
            progress: services.progress,
            limits,
        }
    }

    /// Paths currently in the working set, used as the discovery exclusion
    /// set.
    pub fn known_paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}
