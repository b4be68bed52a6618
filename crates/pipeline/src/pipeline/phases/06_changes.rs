use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::{Context, Result};
use async_trait::async_trait;
use spindle_core::ProgressEvent;
use tracing::info;

/// Asks the generation service for the typed change set implementing the
/// intent. Malformed structured output is fatal.
pub struct GenerateChangesPhase;

#[async_trait]
impl Phase for GenerateChangesPhase {
    fn name(&self) -> &'static str {
        "GenerateChangesPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let assistant = context.assistant.clone();

        let changes = assistant
            .generate_changes(
                &context.user_prompt,
                &context.intent,
                &context.files,
                context.project_tree.as_deref(),
            )
            .await
            .context("Change generation failed")?;

        info!(count = changes.len(), "Generated changes");
        context
            .progress
            .on_progress(&ProgressEvent::ChangesGenerated {
                count: changes.len(),
            });

        context.changes = changes;
        Ok(())
    }
}
