use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a change does to its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    NewFile,
    DeleteFile,
    ModifyFile,
}

impl ChangeOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOperation::NewFile => "new_file",
            ChangeOperation::DeleteFile => "delete_file",
            ChangeOperation::ModifyFile => "modify_file",
        }
    }
}

/// How a modification relates to the code blocks it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    ReplaceBlock,
    AddBlock,
    RemoveBlock,
    None,
}

impl ModificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationType::ReplaceBlock => "replace_block",
            ModificationType::AddBlock => "add_block",
            ModificationType::RemoveBlock => "remove_block",
            ModificationType::None => "none",
        }
    }
}

/// One file-scoped edit proposed by the generation service.
///
/// Invariants, restored by [`Change::normalize`] on anything that crosses
/// the LLM boundary: a `delete_file` change carries `modification_type:
/// none` and empty code blocks; a `new_file` change never carries an
/// `old_code_block`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Change {
    /// Type of change operation.
    pub operation: ChangeOperation,
    /// Path to the file being created, deleted or modified.
    pub file_path: String,
    /// Block-level kind of the modification; `none` for deleted files.
    pub modification_type: ModificationType,
    /// Description of the modification relative to the code blocks. Empty
    /// for deleted files.
    pub modification_description: String,
    /// Existing code block to replace or remove. Empty for new or deleted
    /// files.
    pub old_code_block: String,
    /// New code block to insert. Empty for deleted files.
    pub new_code_block: String,
}

impl Change {
    pub fn new_file(
        path: impl Into<String>,
        description: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            operation: ChangeOperation::NewFile,
            file_path: path.into(),
            modification_type: ModificationType::AddBlock,
            modification_description: description.into(),
            old_code_block: String::new(),
            new_code_block: code.into(),
        }
    }

    pub fn delete_file(path: impl Into<String>) -> Self {
        Self {
            operation: ChangeOperation::DeleteFile,
            file_path: path.into(),
            modification_type: ModificationType::None,
            modification_description: String::new(),
            old_code_block: String::new(),
            new_code_block: String::new(),
        }
    }

    pub fn modify_file(
        path: impl Into<String>,
        modification_type: ModificationType,
        description: impl Into<String>,
        old_code_block: impl Into<String>,
        new_code_block: impl Into<String>,
    ) -> Self {
        Self {
            operation: ChangeOperation::ModifyFile,
            file_path: path.into(),
            modification_type,
            modification_description: description.into(),
            old_code_block: old_code_block.into(),
            new_code_block: new_code_block.into(),
        }
    }

    /// Restores the structural invariants on a change parsed from LLM
    /// output.
    pub fn normalize(&mut self) {
        match self.operation {
            ChangeOperation::DeleteFile => {
                self.modification_type = ModificationType::None;
                self.modification_description.clear();
                self.old_code_block.clear();
                self.new_code_block.clear();
            }
            ChangeOperation::NewFile => {
                self.old_code_block.clear();
            }
            ChangeOperation::ModifyFile => {}
        }
    }

    /// True when the invariants already hold.
    pub fn is_normalized(&self) -> bool {
        match self.operation {
            ChangeOperation::DeleteFile => {
                self.modification_type == ModificationType::None
                    && self.old_code_block.is_empty()
                    && self.new_code_block.is_empty()
            }
            ChangeOperation::NewFile => self.old_code_block.is_empty(),
            ChangeOperation::ModifyFile => true,
        }
    }
}

/// Wire wrapper for the change-generation structured response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ChangeSet {
    /// All file changes to be made, in application order.
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn validate(&self) -> Result<(), super::ValidationError> {
        if self.changes.iter().any(|c| c.file_path.trim().is_empty()) {
            return Err(super::ValidationError::EmptyChangePath);
        }
        Ok(())
    }
}

/// Wire wrapper for the discovery relevance-filter structured response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RelevantPaths {
    /// File paths relevant to the user intent.
    pub file_paths: Vec<String>,
}

/// Append-only audit trail of file-system side effects for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub modified_files: Vec<String>,
    pub deleted_files: Vec<String>,
    pub created_files: Vec<String>,
}

impl ApplyResult {
    pub fn is_empty(&self) -> bool {
        self.modified_files.is_empty()
            && self.deleted_files.is_empty()
            && self.created_files.is_empty()
    }

    pub fn merge(&mut self, other: ApplyResult) {
        self.modified_files.extend(other.modified_files);
        self.deleted_files.extend(other.deleted_files);
        self.created_files.extend(other.created_files);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_constructor_is_normalized() {
        let change = Change::delete_file("src/old.ts");
        assert!(change.is_normalized());
        assert_eq!(change.modification_type, ModificationType::None);
        assert!(change.old_code_block.is_empty());
        assert!(change.new_code_block.is_empty());
    }

    #[test]
    fn test_normalize_delete_clears_blocks() {
        let mut change = Change {
            operation: ChangeOperation::DeleteFile,
            file_path: "src/old.ts".to_string(),
            modification_type: ModificationType::ReplaceBlock,
            modification_description: "remove".to_string(),
            old_code_block: "old".to_string(),
            new_code_block: "new".to_string(),
        };
        assert!(!change.is_normalized());
        change.normalize();
        assert!(change.is_normalized());
    }

    #[test]
    fn test_normalize_new_file_drops_old_block() {
        let mut change = Change::new_file("src/new.ts", "create", "content");
        change.old_code_block = "stale".to_string();
        change.normalize();
        assert!(change.old_code_block.is_empty());
        assert_eq!(change.new_code_block, "content");
    }

    #[test]
    fn test_operation_wire_format() {
        let json = serde_json::to_string(&ChangeOperation::NewFile).unwrap();
        assert_eq!(json, "\"new_file\"");
        let parsed: ModificationType = serde_json::from_str("\"replace_block\"").unwrap();
        assert_eq!(parsed, ModificationType::ReplaceBlock);
    }

    #[test]
    fn test_change_set_rejects_empty_path() {
        let set = ChangeSet {
            changes: vec![Change::delete_file("  ")],
        };
        assert!(set.validate().is_err());

        let set = ChangeSet {
            changes: vec![Change::delete_file("src/old.ts")],
        };
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_apply_result_merge() {
        let mut result = ApplyResult::default();
        assert!(result.is_empty());

        result.merge(ApplyResult {
            modified_files: vec!["a.ts".to_string()],
            deleted_files: vec![],
            created_files: vec!["b.ts".to_string()],
        });
        result.merge(ApplyResult {
            modified_files: vec![],
            deleted_files: vec!["c.ts".to_string()],
            created_files: vec![],
        });

        assert_eq!(result.modified_files, vec!["a.ts"]);
        assert_eq!(result.deleted_files, vec!["c.ts"]);
        assert_eq!(result.created_files, vec!["b.ts"]);
    }
}
