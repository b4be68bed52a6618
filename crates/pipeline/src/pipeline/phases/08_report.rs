use crate::apply;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::phase_trait::Phase;
use anyhow::{bail, Result};
use async_trait::async_trait;
use spindle_core::model::{Change, ChangeOperation, ModificationType};
use spindle_core::paths;
use tracing::info;

pub const REPORT_FILE: &str = "CHANGES.md";

/// Write-only mode: instead of touching source files, render every change
/// grouped by file into a reviewable Markdown report at the project root.
pub struct WriteReportPhase;

#[async_trait]
impl Phase for WriteReportPhase {
    fn name(&self) -> &'static str {
        "WriteReportPhase"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<()> {
        if context.changes.is_empty() {
            info!("No changes to write");
            return Ok(());
        }

        let report = render_report(&context.changes);

        let resolved = paths::resolve_path(REPORT_FILE, &context.project_root);
        if !paths::is_within_root(&resolved, &context.project_root) {
            bail!("report path {} escapes the project root", REPORT_FILE);
        }

        context.fs.write(&resolved, &report).await?;

        info!(path = %resolved.display(), "Changes written to report");
        context.result.created_files.push(REPORT_FILE.to_string());
        Ok(())
    }
}

/// The full report: header plus one section per file, in first-seen order.
pub fn render_report(changes: &[Change]) -> String {
    let mut sections = vec![
        "# Code Changes\n\nReview the changes and apply manually to your codebase.\n\n---\n"
            .to_string(),
    ];

    for (file_path, group) in apply::group_by_file(changes) {
        sections.push(render_file_section(&file_path, &group));
    }

    sections.join("\n")
}

fn render_file_section(file_path: &str, changes: &[Change]) -> String {
    let mut out = vec![format!("## File: {}\n", file_path)];

    for change in changes {
        let heading = match change.operation {
            ChangeOperation::NewFile => format!(
                "Create new file: {}",
                non_empty(&change.modification_description, "New file creation")
            ),
            ChangeOperation::DeleteFile => format!(
                "Delete file: {}",
                non_empty(&change.modification_description, "Remove this file")
            ),
            ChangeOperation::ModifyFile => format!(
                "{}: {}",
                change.modification_type.as_str(),
                non_empty(&change.modification_description, "Modify existing file")
            ),
        };
        out.push(format!("### {}\n", heading));

        if !change.old_code_block.is_empty() && change.operation == ChangeOperation::ModifyFile {
            out.push(format!("**Old Code:**\n```\n{}\n```\n", change.old_code_block));
        }

        if !change.new_code_block.is_empty() && change.operation != ChangeOperation::DeleteFile {
            out.push(format!("**New Code:**\n```\n{}\n```\n", change.new_code_block));
        }

        let action = match change.operation {
            ChangeOperation::DeleteFile => "Delete this file completely",
            ChangeOperation::NewFile => "Create this file with the new code above",
            ChangeOperation::ModifyFile => match change.modification_type {
                ModificationType::ReplaceBlock => {
                    "Replace the old code block with the new code block above"
                }
                ModificationType::AddBlock => {
                    "Add the new code block to the appropriate location in the file"
                }
                ModificationType::RemoveBlock => "Remove the old code block from the file",
                ModificationType::None => "No block-level action",
            },
        };
        out.push(format!("**Action:** {}\n", action));

        out.push("---\n".to_string());
    }

    out.join("\n")
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
