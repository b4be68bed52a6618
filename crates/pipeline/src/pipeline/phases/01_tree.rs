use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use crate::tree::TreeBuilder;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Renders the project tree once per run. Generation failure is tolerated;
/// downstream prompts simply go without a tree.
pub struct ProjectTreePhase;

#[async_trait]
impl Phase for ProjectTreePhase {
    fn name(&self) -> &'static str {
        "ProjectTreePhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        let builder = TreeBuilder::new(context.limits.tree_max_files);

        match builder.build(&context.project_root).await {
            Ok(tree) => {
                debug!(lines = tree.lines().count(), "Project tree generated");
                context.project_tree = Some(tree);
            }
            Err(error) => {
                warn!(error = %error, "Project tree generation failed, continuing without it");
            }
        }

        Ok(())
    }
}
