//! Guard predicates over the analyzed intent.

use super::context::PipelineContext;

/// The intent phase asked for more context before proceeding.
pub fn needs_more_context(context: &PipelineContext) -> bool {
    context.intent.needs_more_context
}

/// The request calls for file changes.
pub fn wants_edit(context: &PipelineContext) -> bool {
    context.intent.is_edit()
}

/// The request is informational only.
pub fn is_ask(context: &PipelineContext) -> bool {
    !context.intent.is_edit()
}
