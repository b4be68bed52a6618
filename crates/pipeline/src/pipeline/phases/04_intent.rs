use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Asks the understanding service what the requester wants. Overwrites the
/// placeholder intent exactly once; malformed structured output is fatal.
pub struct IntentPhase;

#[async_trait]
impl Phase for IntentPhase {
    fn name(&self) -> &'static str {
        "IntentPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let assistant = context.assistant.clone();

        let intent = assistant
            .analyze_intent(
                &context.user_prompt,
                &context.files,
                context.project_tree.as_deref(),
            )
            .await
            .context("Intent analysis failed")?;

        info!(
            mode = ?intent.mode,
            needs_more_context = intent.needs_more_context,
            "Intent analyzed"
        );

        context.intent = intent;
        Ok(())
    }
}
