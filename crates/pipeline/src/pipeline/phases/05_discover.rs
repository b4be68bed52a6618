use crate::discovery;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::{Context, Result};
use async_trait::async_trait;
use spindle_core::model::FileRecord;
use spindle_core::ProgressEvent;
use std::collections::HashSet;
use tracing::{debug, info};

/// Expands the working file set from the intent's explicit paths and
/// search hints, then lets the understanding service keep only the
/// relevant candidates. New records enter without content; the following
/// read phase loads them.
pub struct DiscoverFilesPhase;

#[async_trait]
impl Phase for DiscoverFilesPhase {
    fn name(&self) -> &'static str {
        "DiscoverFilesPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let existing = context.known_paths();

        let mut discovered = discovery::discover_from_paths(
            &context.intent.file_paths,
            &existing,
            &context.project_root,
        );
        debug!(count = discovered.len(), "Path-based discovery");

        let mut hints = context.intent.search_terms.clone();
        hints.push(context.intent.description.clone());

        let from_terms = discovery::discover_from_search_terms(
            &hints,
            &existing,
            &context.project_root,
            context.search.as_ref(),
            context.limits.max_files_per_term,
        )
        .await;
        debug!(count = from_terms.len(), "Term-based discovery");
        discovered.extend(from_terms);

        let mut seen = HashSet::new();
        discovered.retain(|path| seen.insert(path.clone()));

        let candidates: Vec<String> = discovered
            .iter()
            .map(|path| path.display().to_string())
            .collect();

        let relevant = context
            .assistant
            .filter_relevant_paths(&context.intent, &candidates)
            .await
            .context("Relevance filtering of discovered paths failed")?;

        info!(
            candidates = candidates.len(),
            admitted = relevant.len(),
            "Discovered new files"
        );
        context
            .progress
            .on_progress(&ProgressEvent::FilesDiscovered {
                count: relevant.len(),
            });

        for path in relevant {
            context.files.push(FileRecord::new(path));
        }

        Ok(())
    }
}
