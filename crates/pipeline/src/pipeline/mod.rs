pub mod conditions;
pub mod config;
pub mod context;
pub mod engine;
pub mod phase_trait;
pub mod phases;
pub mod runner;

pub use config::PipelineLimits;
pub use context::{PipelineContext, PipelineServices};
pub use engine::{Condition, PhaseDef, Pipeline};
pub use phase_trait::Phase;
pub use runner::{process_request, standard_pipeline, ApplyMode, RequestOutcome};
