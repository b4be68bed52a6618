use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Fills in semantic summaries for records that have content but no
/// summary yet. Records summarized in an earlier pass keep theirs.
pub struct SemanticParsePhase;

#[async_trait]
impl Phase for SemanticParsePhase {
    fn name(&self) -> &'static str {
        "SemanticParsePhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let parser = context.parser.clone();
        let mut parsed = 0usize;

        for record in &mut context.files {
            if record.semantics.is_some() || record.content.is_none() {
                continue;
            }
            let summary = parser.parse(record);
            record.semantics = Some(summary);
            parsed += 1;
        }

        debug!(parsed = parsed, total = context.files.len(), "Semantic summaries");
        Ok(())
    }
}
