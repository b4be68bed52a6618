//! Prompt assembly for the code assistant.
//!
//! Formatting helpers render the working file set, its semantic summaries,
//! and proposed changes into the text blocks the prompts are built from.

use spindle_core::model::{Change, ChangeOperation, FileRecord, Intent};

/// Renders one file as `path:` followed by its content, truncated to
/// `max_lines` lines.
pub fn format_file_preview(file: &FileRecord, max_lines: usize) -> Option<String> {
    let content = file.content.as_deref()?;

    let lines: Vec<&str> = content.lines().collect();
    let body = if lines.len() > max_lines {
        format!("{}\n...[truncated]", lines[..max_lines].join("\n"))
    } else {
        content.to_string()
    };

    Some(format!("{}:\n{}", file.path, body))
}

/// Previews for every file that has content. Files still waiting on a read
/// are skipped.
pub fn format_file_previews(files: &[FileRecord], max_lines: usize) -> String {
    files
        .iter()
        .filter_map(|file| format_file_preview(file, max_lines))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Compact structural summaries for every file that has one.
pub fn format_file_semantics(files: &[FileRecord]) -> String {
    files
        .iter()
        .filter_map(|file| {
            let semantics = file.semantics.as_ref()?;
            let imports: Vec<&str> = semantics.imports.iter().map(|i| i.source.as_str()).collect();
            let exports: Vec<&str> = semantics.exports.iter().map(|e| e.name.as_str()).collect();
            let functions: Vec<&str> =
                semantics.functions.iter().map(|f| f.name.as_str()).collect();
            let classes: Vec<&str> = semantics.classes.iter().map(|c| c.name.as_str()).collect();
            Some(format!(
                "{}:\n- Imports: {}\n- Exports: {}\n- Functions: {}\n- Classes: {}",
                file.path,
                imports.join(", "),
                exports.join(", "),
                functions.join(", "),
                classes.join(", "),
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a change list the way the rewrite prompt consumes it.
pub fn format_changes(changes: &[Change]) -> String {
    changes
        .iter()
        .map(|change| {
            let mut description =
                format!("{}: {}", change.file_path, change.operation.as_str());

            if change.operation != ChangeOperation::DeleteFile {
                description.push_str(&format!(" ({})", change.modification_type.as_str()));
            }

            if !change.modification_description.is_empty() {
                description.push_str(&format!("\n{}", change.modification_description));
            }

            if !change.old_code_block.is_empty() {
                description.push_str(&format!("\nOld Code Block:\n{}", change.old_code_block));
            }

            if !change.new_code_block.is_empty() {
                description.push_str(&format!("\nNew Code Block:\n{}", change.new_code_block));
            }

            description
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_tree(tree: Option<&str>) -> &str {
    tree.unwrap_or("(unavailable)")
}

pub fn intent_prompt(
    user_prompt: &str,
    files: &[FileRecord],
    tree: Option<&str>,
    max_lines: usize,
) -> String {
    format!(
        "Analyze this code modification request to understand the intent and scope.\n\
         \n\
         User Request: {user_prompt}\n\
         \n\
         Files provided:\n{previews}\n\
         \n\
         Semantic Analysis:\n{semantics}\n\
         \n\
         Project tree:\n{tree}\n\
         \n\
         Based on this information, determine:\n\
         1. The mode - whether the user is requesting information (ask) or wants to make code changes (edit)\n\
         2. A clear description of what needs to be done (be specific about the scope and impact)\n\
         3. Whether you need more context to understand the request fully - set needs_more_context to true if additional files or information are needed\n\
         4. A list of specific file paths that are relevant to this intent (file_paths)\n\
         5. Search terms that could help discover relevant code or files (search_terms)\n\
         \n\
         Focus on understanding the core intent rather than implementation details.\n\
         Generate only precise, existing terms that would actually appear in the source code.",
        user_prompt = user_prompt,
        previews = format_file_previews(files, max_lines),
        semantics = format_file_semantics(files),
        tree = format_tree(tree),
    )
}

pub fn changes_prompt(
    user_prompt: &str,
    intent: &Intent,
    files: &[FileRecord],
    tree: Option<&str>,
    max_lines: usize,
) -> String {
    format!(
        "You are a senior software engineer generating precise code changes. Generate high-quality, production-ready code changes to implement the following request:\n\
         \n\
         User Request: {user_prompt}\n\
         \n\
         Intent Analysis:\n\
         - Description: {description}\n\
         \n\
         Project Tree:\n{tree}\n\
         \n\
         Code Quality Requirements:\n\
         - Follow the existing file patterns and conventions\n\
         - Maintain consistent indentation and formatting\n\
         - Place utility functions and constants at appropriate scope levels\n\
         - Ensure all variables are properly scoped\n\
         \n\
         Files provided:\n{previews}\n\
         \n\
         Generate a \"changes\" array of change objects. Each change object has:\n\
         1. operation: [new_file, delete_file, modify_file]\n\
         2. file_path: the path to the file being created, deleted or modified\n\
         3. modification_type: [replace_block, add_block, remove_block, none]. For deleted files, use none.\n\
         4. modification_description: the description of the modification relative to the code blocks. Leave empty if not applicable.\n\
         5. old_code_block: applicable when modifying existing files. Leave empty if not applicable.\n\
         6. new_code_block: applicable when modifying existing files or creating new ones. Leave empty for deleted files.\n\
         \n\
         Focus on generating precise changes aligned with existing code structure while maintaining high code quality.\n\
         For modifications, generate multiple changes per file if necessary.",
        user_prompt = user_prompt,
        description = intent.description,
        tree = format_tree(tree),
        previews = format_file_previews(files, max_lines),
    )
}

pub fn rewrite_prompt(changes: &[Change], current_content: &str) -> String {
    let header = if changes
        .first()
        .map(|c| c.operation == ChangeOperation::NewFile)
        .unwrap_or(false)
    {
        "Create a new file with the requested code blocks."
    } else {
        "Apply ONLY the specified modifications to this existing file."
    };

    format!(
        "{header}\n\
         \n\
         Current File Content:\n\
         ```\n\
         {current_content}\n\
         ```\n\
         \n\
         Modifications to Apply:\n{changes}\n\
         \n\
         Instructions:\n\
         1. Start with the exact current file content shown above\n\
         2. Apply ONLY the specified modifications - do not change anything else\n\
         3. For replace_block: find the exact old code block and replace it with the new code block\n\
         4. For add_block: insert the new code block at the appropriate location\n\
         5. For remove_block: remove only the specified code block\n\
         6. Maintain ALL existing formatting, imports, exports, and other code exactly as they are\n\
         7. Return the complete modified file content\n\
         8. Do not add explanations, comments, or markdown formatting\n\
         \n\
         Apply the modifications precisely and return the complete file.",
        header = header,
        current_content = current_content,
        changes = format_changes(changes),
    )
}

pub fn answer_prompt(
    user_prompt: &str,
    intent: &Intent,
    files: &[FileRecord],
    tree: Option<&str>,
    max_lines: usize,
) -> String {
    format!(
        "User Question: {user_prompt}\n\
         \n\
         Intent Analysis:\n\
         - Description: {description}\n\
         \n\
         Project Structure:\n{tree}\n\
         \n\
         Files analyzed:\n{previews}\n\
         \n\
         Semantic Analysis:\n{semantics}\n\
         \n\
         Based on this codebase analysis, provide a comprehensive, accurate answer to the user's question.\n\
         Include specific code examples, file references, and explanations where relevant.\n\
         If you cannot find the requested information in the provided files, clearly state what's missing.\n\
         Focus on being helpful and precise while avoiding speculation about code not shown.",
        user_prompt = user_prompt,
        description = intent.description,
        tree = format_tree(tree),
        previews = format_file_previews(files, max_lines),
        semantics = format_file_semantics(files),
    )
}

pub fn filter_paths_prompt(intent: &Intent, candidates: &[String]) -> String {
    format!(
        "The user intent is:\n{description}\n\
         \n\
         Candidate file paths discovered in the project:\n{candidates}\n\
         \n\
         Return the subset of candidate paths that are actually relevant to the intent, \
         as a \"file_paths\" array. Return only paths from the candidate list, unchanged.",
        description = intent.description,
        candidates = candidates.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::model::{IntentMode, ModificationType};

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord::with_content(path, content)
    }

    #[test]
    fn test_preview_truncation() {
        let content = (0..10).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let file = record("src/a.ts", &content);

        let preview = format_file_preview(&file, 3).unwrap();
        assert!(preview.starts_with("src/a.ts:\nline0\nline1\nline2"));
        assert!(preview.ends_with("...[truncated]"));

        let full = format_file_preview(&file, 100).unwrap();
        assert!(!full.contains("truncated"));
    }

    #[test]
    fn test_preview_skips_unread_files() {
        let files = vec![FileRecord::new("src/pending.ts"), record("src/a.ts", "x")];
        let previews = format_file_previews(&files, 10);
        assert!(!previews.contains("pending"));
        assert!(previews.contains("src/a.ts"));
    }

    #[test]
    fn test_format_changes_delete_has_no_type() {
        let changes = vec![Change::delete_file("src/old.ts")];
        let formatted = format_changes(&changes);
        assert!(formatted.contains("src/old.ts: delete_file"));
        assert!(!formatted.contains("("));
    }

    #[test]
    fn test_format_changes_modify() {
        let changes = vec![Change::modify_file(
            "src/a.ts",
            ModificationType::ReplaceBlock,
            "swap impl",
            "old()",
            "new()",
        )];
        let formatted = format_changes(&changes);
        assert!(formatted.contains("Old Code Block:\nold()"));
        assert!(formatted.contains("New Code Block:\nnew()"));
        assert!(formatted.contains("swap impl"));
    }

    #[test]
    fn test_intent_prompt_handles_missing_tree() {
        let prompt = intent_prompt("add logging", &[], None, 10);
        assert!(prompt.contains("(unavailable)"));
        assert!(prompt.contains("add logging"));
    }

    #[test]
    fn test_rewrite_prompt_new_file_header() {
        let changes = vec![Change::new_file("src/new.ts", "create", "const x = 1;")];
        let prompt = rewrite_prompt(&changes, "");
        assert!(prompt.starts_with("Create a new file"));
    }

    #[test]
    fn test_rewrite_prompt_modify_header() {
        let changes = vec![Change::modify_file(
            "src/a.ts",
            ModificationType::AddBlock,
            "",
            "",
            "x",
        )];
        let prompt = rewrite_prompt(&changes, "existing");
        assert!(prompt.starts_with("Apply ONLY"));
        assert!(prompt.contains("existing"));
    }

    #[test]
    fn test_filter_paths_prompt_lists_candidates() {
        let intent = Intent {
            mode: IntentMode::Edit,
            description: "Add role checks to auth".to_string(),
            needs_more_context: true,
            file_paths: vec![],
            search_terms: vec![],
        };
        let prompt =
            filter_paths_prompt(&intent, &["/p/a.ts".to_string(), "/p/b.ts".to_string()]);
        assert!(prompt.contains("/p/a.ts\n/p/b.ts"));
    }
}
