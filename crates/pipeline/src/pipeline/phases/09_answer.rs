use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Ask-mode terminal phase: produce a free-text answer from the analyzed
/// context.
pub struct AnswerPhase;

#[async_trait]
impl Phase for AnswerPhase {
    fn name(&self) -> &'static str {
        "AnswerPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let assistant = context.assistant.clone();

        let answer = assistant
            .generate_answer(
                &context.user_prompt,
                &context.intent,
                &context.files,
                context.project_tree.as_deref(),
            )
            .await
            .context("Answer generation failed")?;

        info!(chars = answer.len(), "Answer generated");
        context.answer = Some(answer);
        Ok(())
    }
}
