use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::join_all;
use spindle_core::model::{FileRecord, Language};
use spindle_core::paths;
use tracing::warn;

/// Loads content for every record that does not have it yet, one
/// concurrent task per file. A record that already holds content passes
/// through untouched, so re-entry after a discovery expansion is a no-op
/// for previously read files. Unreadable files are dropped with a warning;
/// the run continues with whatever could actually be read.
pub struct ReadFilesPhase;

#[async_trait]
impl Phase for ReadFilesPhase {
    fn name(&self) -> &'static str {
        "ReadFilesPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let fs = context.fs.clone();
        let project_root = context.project_root.clone();
        let records = std::mem::take(&mut context.files);

        let tasks = records.into_iter().map(|record| {
            let fs = fs.clone();
            let project_root = project_root.clone();

            async move {
                if record.has_content() {
                    return Some(record);
                }

                let resolved = paths::resolve_path(&record.path, &project_root);

                if !fs.is_file(&resolved).await {
                    warn!(path = %record.path, "File not found, skipping");
                    return None;
                }

                match fs.read_to_string(&resolved).await {
                    Ok(content) => Some(FileRecord {
                        path: resolved.display().to_string(),
                        language: Some(Language::from_path(&resolved)),
                        content: Some(content),
                        semantics: record.semantics,
                    }),
                    Err(error) => {
                        warn!(path = %record.path, error = %error, "Failed to read file, skipping");
                        None
                    }
                }
            }
        });

        context.files = join_all(tasks).await.into_iter().flatten().collect();
        Ok(())
    }
}
