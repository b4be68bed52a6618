use super::ValidationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MIN_DESCRIPTION_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 500;

/// What the requester wants from the run.
///
/// A closed enum rather than a boolean so that an intent is always exactly
/// one of the two branches the pipeline knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IntentMode {
    /// The request is for information, explanation, or review.
    Ask,
    /// The request requires changing files.
    Edit,
}

/// The understanding service's reading of the user request. Immutable once
/// assigned to the pipeline context; every downstream conditional branch
/// keys off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Intent {
    /// Whether the request asks for information or for file changes.
    pub mode: IntentMode,
    /// Clear description of what the user wants to accomplish.
    pub description: String,
    /// Whether additional files or information are needed to proceed.
    pub needs_more_context: bool,
    /// File paths relevant to this intent.
    pub file_paths: Vec<String>,
    /// Code symbols that could help discover relevant code or files.
    pub search_terms: Vec<String>,
}

impl Intent {
    /// The value a fresh context carries before intent analysis has run.
    pub fn placeholder() -> Self {
        Self {
            mode: IntentMode::Ask,
            description: String::new(),
            needs_more_context: false,
            file_paths: Vec::new(),
            search_terms: Vec::new(),
        }
    }

    /// Validates the constraints the understanding service is contracted
    /// to meet. The placeholder intentionally fails this check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.description.chars().count();
        if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&len) {
            return Err(ValidationError::DescriptionLength { len });
        }
        if self.file_paths.iter().any(|p| p.trim().is_empty()) {
            return Err(ValidationError::EmptyFilePath);
        }
        Ok(())
    }

    pub fn is_edit(&self) -> bool {
        self.mode == IntentMode::Edit
    }
}

impl Default for Intent {
    fn default() -> Self {
        Self::placeholder()
    }
}
