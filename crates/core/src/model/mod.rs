//! Data model threaded through the pipeline: working file records, the
//! analyzed intent, and the typed change set with its audit trail.

mod change;
mod file;
mod intent;

pub use change::{ApplyResult, Change, ChangeOperation, ChangeSet, ModificationType, RelevantPaths};
pub use file::{
    ClassInfo, Export, ExportKind, FileRecord, FunctionInfo, Import, Language, SemanticSummary,
};
pub use intent::{Intent, IntentMode};

use thiserror::Error;

/// Violations of the contracts structured collaborator output must meet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("intent description must be 10-500 characters, got {len}")]
    DescriptionLength { len: usize },

    #[error("intent file paths must not be empty")]
    EmptyFilePath,

    #[error("change file path must not be empty")]
    EmptyChangePath,
}
