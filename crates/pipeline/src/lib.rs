pub mod apply;
pub mod discovery;
pub mod pipeline;
pub mod search;
pub mod semantic;
pub mod tree;
mod walk;

pub use apply::{ApplyError, ApplyOutcome, ChangeApplier};
pub use pipeline::{
    process_request, standard_pipeline, ApplyMode, Condition, Phase, PhaseDef, Pipeline,
    PipelineContext, PipelineLimits, PipelineServices, RequestOutcome,
};
pub use search::ContentSearch;
pub use semantic::SemanticParser;
pub use tree::TreeBuilder;
