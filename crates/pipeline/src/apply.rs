//! Realizes a change set as file-system effects.
//!
//! Changes are grouped by file path; each group is one atomic content
//! rewrite handed to the generation service, never a sequence of text
//! patches. Groups run concurrently since each owns exactly one path.
//! Failure containment: a failed delete is logged and swallowed, a failed
//! read or write is fatal for its group but does not stop the others, and
//! there is no cross-file rollback.

use futures_util::future::join_all;
use spindle_core::model::{ApplyResult, Change, ChangeOperation};
use spindle_core::paths;
use spindle_core::{BackendError, FileSystem};
use spindle_llm::CodeAssistant;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("path {path} escapes the project root")]
    OutsideProjectRoot { path: String },

    #[error("change group for {path} mixes delete_file with other operations")]
    MixedOperations { path: String },

    #[error("could not read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("could not write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("rewrite failed for {path}")]
    RewriteFailed {
        path: String,
        #[source]
        source: BackendError,
    },
}

/// Outcome of applying one change set: the audit trail of effects that
/// succeeded, plus the per-group failures. Both can be non-empty at once;
/// partial application is visible to the caller.
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    pub result: ApplyResult,
    pub failures: Vec<ApplyError>,
}

enum FileEffect {
    Created(String),
    Modified(String),
    Deleted(String),
    /// A swallowed delete failure: logged, no audit entry.
    Nothing,
}

pub struct ChangeApplier {
    fs: Arc<dyn FileSystem>,
    assistant: Arc<CodeAssistant>,
    project_root: PathBuf,
}

impl ChangeApplier {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        assistant: Arc<CodeAssistant>,
        project_root: PathBuf,
    ) -> Self {
        Self {
            fs,
            assistant,
            project_root,
        }
    }

    /// Applies a change set. Returns an error only for batch-level
    /// validation; per-group failures are collected in the outcome so that
    /// the effects of successful groups remain on record.
    pub async fn apply(&self, changes: &[Change]) -> Result<ApplyOutcome, ApplyError> {
        let groups = group_by_file(changes);
        validate_groups(&groups)?;

        let tasks = groups
            .iter()
            .map(|(path, group)| self.apply_group(path, group));
        let results = join_all(tasks).await;

        let mut outcome = ApplyOutcome::default();
        for result in results {
            match result {
                Ok(FileEffect::Created(path)) => outcome.result.created_files.push(path),
                Ok(FileEffect::Modified(path)) => outcome.result.modified_files.push(path),
                Ok(FileEffect::Deleted(path)) => outcome.result.deleted_files.push(path),
                Ok(FileEffect::Nothing) => {}
                Err(error) => outcome.failures.push(error),
            }
        }

        Ok(outcome)
    }

    async fn apply_group(
        &self,
        file_path: &str,
        group: &[Change],
    ) -> Result<FileEffect, ApplyError> {
        let resolved = self.resolve_checked(file_path)?;

        match group[0].operation {
            ChangeOperation::DeleteFile => match self.fs.remove_file(&resolved).await {
                Ok(()) => {
                    info!(path = %file_path, "File deleted");
                    Ok(FileEffect::Deleted(file_path.to_string()))
                }
                Err(error) => {
                    warn!(path = %file_path, error = %error, "File deletion failed, continuing");
                    Ok(FileEffect::Nothing)
                }
            },
            ChangeOperation::NewFile => {
                let content = self
                    .assistant
                    .apply_file_changes(group, "")
                    .await
                    .map_err(|source| ApplyError::RewriteFailed {
                        path: file_path.to_string(),
                        source,
                    })?;

                self.write_file(file_path, &resolved, &content).await?;
                info!(path = %file_path, "File created");
                Ok(FileEffect::Created(file_path.to_string()))
            }
            ChangeOperation::ModifyFile => {
                let current = self.fs.read_to_string(&resolved).await.map_err(|error| {
                    ApplyError::ReadFailed {
                        path: file_path.to_string(),
                        message: error.to_string(),
                    }
                })?;

                let content = self
                    .assistant
                    .apply_file_changes(group, &current)
                    .await
                    .map_err(|source| ApplyError::RewriteFailed {
                        path: file_path.to_string(),
                        source,
                    })?;

                self.write_file(file_path, &resolved, &content).await?;
                info!(path = %file_path, "File modified");
                Ok(FileEffect::Modified(file_path.to_string()))
            }
        }
    }

    /// Resolves a change path and enforces the boundary. Unlike discovery,
    /// a violation here is raised: this is an explicit write/delete target.
    fn resolve_checked(&self, file_path: &str) -> Result<PathBuf, ApplyError> {
        let resolved = paths::resolve_path(file_path, &self.project_root);
        if !paths::is_within_root(&resolved, &self.project_root) {
            return Err(ApplyError::OutsideProjectRoot {
                path: file_path.to_string(),
            });
        }
        Ok(resolved)
    }

    async fn write_file(
        &self,
        file_path: &str,
        resolved: &Path,
        content: &str,
    ) -> Result<(), ApplyError> {
        if let Some(parent) = resolved.parent() {
            self.fs
                .create_dir_all(parent)
                .await
                .map_err(|error| ApplyError::WriteFailed {
                    path: file_path.to_string(),
                    message: error.to_string(),
                })?;
        }

        self.fs
            .write(resolved, content)
            .await
            .map_err(|error| ApplyError::WriteFailed {
                path: file_path.to_string(),
                message: error.to_string(),
            })
    }
}

/// Groups changes by file path, preserving first-seen group order and the
/// order of changes within each group.
pub(crate) fn group_by_file(changes: &[Change]) -> Vec<(String, Vec<Change>)> {
    let mut groups: Vec<(String, Vec<Change>)> = Vec::new();

    for change in changes {
        match groups.iter_mut().find(|(path, _)| *path == change.file_path) {
            Some((_, group)) => group.push(change.clone()),
            None => groups.push((change.file_path.clone(), vec![change.clone()])),
        }
    }

    groups
}

/// Rejects groups that mix `delete_file` with any other operation, before
/// any file-system effect happens.
fn validate_groups(groups: &[(String, Vec<Change>)]) -> Result<(), ApplyError> {
    for (path, group) in groups {
        let deletes = group
            .iter()
            .filter(|c| c.operation == ChangeOperation::DeleteFile)
            .count();
        if deletes > 0 && deletes != group.len() {
            return Err(ApplyError::MixedOperations { path: path.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::model::ModificationType;
    use spindle_core::MockFileSystem;
    use spindle_llm::{MockLLMClient, MockResponse};

    const ROOT: &str = "/repo";

    fn applier_with(
        responses: Vec<MockResponse>,
        setup: impl FnOnce(&MockFileSystem),
    ) -> (ChangeApplier, Arc<MockFileSystem>) {
        let fs = Arc::new(MockFileSystem::with_root(PathBuf::from(ROOT)));
        setup(&fs);

        let client = MockLLMClient::new();
        client.add_responses(responses);
        let assistant = Arc::new(CodeAssistant::new(Arc::new(client)));

        (
            ChangeApplier::new(fs.clone(), assistant, PathBuf::from(ROOT)),
            fs,
        )
    }

    #[tokio::test]
    async fn test_empty_change_set_touches_nothing() {
        let (applier, fs) = applier_with(vec![], |_| {});

        let outcome = applier.apply(&[]).await.unwrap();
        assert!(outcome.result.is_empty());
        assert!(outcome.failures.is_empty());
        assert_eq!(fs.file_count(), 0);
    }

    #[tokio::test]
    async fn test_new_file_created_with_collaborator_content() {
        let (applier, fs) =
            applier_with(vec![MockResponse::text("export const x = 1;")], |_| {});

        let changes = vec![Change::new_file("src/new.ts", "create", "export const x = 1;")];
        let outcome = applier.apply(&changes).await.unwrap();

        assert_eq!(outcome.result.created_files, vec!["src/new.ts"]);
        assert!(outcome.failures.is_empty());
        assert_eq!(
            fs.read_to_string(Path::new("/repo/src/new.ts")).await.unwrap(),
            "export const x = 1;"
        );
    }

    #[tokio::test]
    async fn test_modify_reads_then_rewrites() {
        let (applier, fs) = applier_with(vec![MockResponse::text("updated content")], |fs| {
            fs.add_file("src/a.ts", "original content");
        });

        let changes = vec![Change::modify_file(
            "src/a.ts",
            ModificationType::ReplaceBlock,
            "swap",
            "original content",
            "updated content",
        )];
        let outcome = applier.apply(&changes).await.unwrap();

        assert_eq!(outcome.result.modified_files, vec!["src/a.ts"]);
        assert_eq!(
            fs.read_to_string(Path::new("/repo/src/a.ts")).await.unwrap(),
            "updated content"
        );
    }

    #[tokio::test]
    async fn test_modify_unreadable_fails_before_rewrite() {
        // No queued LLM responses: reaching the rewrite collaborator would
        // produce a different error than the read failure expected here.
        let (applier, _fs) = applier_with(vec![], |_| {});

        let changes = vec![Change::modify_file(
            "src/missing.ts",
            ModificationType::AddBlock,
            "",
            "",
            "x",
        )];
        let outcome = applier.apply(&changes).await.unwrap();

        assert!(outcome.result.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(
            outcome.failures[0],
            ApplyError::ReadFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_success_is_audited() {
        let (applier, fs) = applier_with(vec![], |fs| {
            fs.add_file("src/old.ts", "stale");
        });

        let outcome = applier
            .apply(&[Change::delete_file("src/old.ts")])
            .await
            .unwrap();

        assert_eq!(outcome.result.deleted_files, vec!["src/old.ts"]);
        assert!(!fs.exists(Path::new("/repo/src/old.ts")).await);
    }

    #[tokio::test]
    async fn test_delete_failure_is_swallowed() {
        let (applier, _fs) = applier_with(vec![], |_| {});

        let outcome = applier
            .apply(&[Change::delete_file("src/never-existed.ts")])
            .await
            .unwrap();

        assert!(outcome.result.deleted_files.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn test_boundary_violation_raises() {
        let (applier, fs) = applier_with(vec![], |_| {});

        let outcome = applier
            .apply(&[Change::new_file("../../etc/evil.ts", "", "x")])
            .await
            .unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(
            outcome.failures[0],
            ApplyError::OutsideProjectRoot { .. }
        ));
        assert_eq!(fs.file_count(), 0);
    }

    #[tokio::test]
    async fn test_mixed_delete_group_rejected_before_effects() {
        let (applier, fs) = applier_with(vec![], |fs| {
            fs.add_file("src/a.ts", "content");
        });

        let changes = vec![
            Change::delete_file("src/a.ts"),
            Change::modify_file("src/a.ts", ModificationType::AddBlock, "", "", "x"),
        ];
        let result = applier.apply(&changes).await;

        assert!(matches!(result, Err(ApplyError::MixedOperations { .. })));
        assert!(fs.exists(Path::new("/repo/src/a.ts")).await);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_effects() {
        let (applier, fs) = applier_with(
            vec![
                MockResponse::text("content a"),
                MockResponse::text("content b"),
            ],
            |fs| {
                fs.fail_writes_to("blocked.ts");
            },
        );

        let changes = vec![
            Change::new_file("ok.ts", "", "content a"),
            Change::new_file("blocked.ts", "", "content b"),
        ];
        let outcome = applier.apply(&changes).await.unwrap();

        assert_eq!(outcome.result.created_files, vec!["ok.ts"]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(
            outcome.failures[0],
            ApplyError::WriteFailed { .. }
        ));
        assert!(fs.exists(Path::new("/repo/ok.ts")).await);
    }

    #[tokio::test]
    async fn test_multiple_changes_one_file_single_rewrite() {
        let (applier, _fs) = applier_with(vec![MockResponse::text("final")], |fs| {
            fs.add_file("src/a.ts", "start");
        });

        // Two modifications to one file: one group, one collaborator call.
        let changes = vec![
            Change::modify_file("src/a.ts", ModificationType::AddBlock, "", "", "x"),
            Change::modify_file("src/a.ts", ModificationType::AddBlock, "", "", "y"),
        ];
        let outcome = applier.apply(&changes).await.unwrap();

        assert_eq!(outcome.result.modified_files, vec!["src/a.ts"]);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_group_by_file_preserves_order() {
        let changes = vec![
            Change::modify_file("b.ts", ModificationType::AddBlock, "", "", "1"),
            Change::modify_file("a.ts", ModificationType::AddBlock, "", "", "2"),
            Change::modify_file("b.ts", ModificationType::AddBlock, "", "", "3"),
        ];

        let groups = group_by_file(&changes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b.ts");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "a.ts");
    }

    #[test]
    fn test_validate_allows_pure_delete_group() {
        let groups = group_by_file(&[
            Change::delete_file("a.ts"),
            Change::delete_file("a.ts"),
            Change::new_file("b.ts", "", "x"),
        ]);
        assert!(validate_groups(&groups).is_ok());
    }
}
