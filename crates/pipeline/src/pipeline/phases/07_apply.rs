use crate::apply::ChangeApplier;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error};

/// Realizes the generated change set on the file system. Effects of groups
/// that succeeded are recorded in the audit trail even when another group
/// failed; the first failure then aborts the phase.
pub struct ApplyChangesPhase;

#[async_trait]
impl Phase for ApplyChangesPhase {
    fn name(&self) -> &'static str {
        "ApplyChangesPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        if context.changes.is_empty() {
            debug!("No changes to apply");
            return Ok(());
        }

        let applier = ChangeApplier::new(
            context.fs.clone(),
            context.assistant.clone(),
            context.project_root.clone(),
        );

        let outcome = applier
            .apply(&context.changes)
            .await
            .context("Change application failed")?;

        context.result.merge(outcome.result);

        let mut failures = outcome.failures.into_iter();
        if let Some(first) = failures.next() {
            for failure in failures {
                error!(error = %failure, "Additional change application failure");
            }
            return Err(first).context("Change application failed");
        }

        Ok(())
    }
}
