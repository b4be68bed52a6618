use super::context::PipelineContext;
use anyhow::Result;
use async_trait::async_trait;

/// One stage of the request pipeline. Phases mutate the shared context in
/// place and run strictly one after another.
#[async_trait]
pub trait Phase: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, context: &mut PipelineContext) -> Result<()>;
}
