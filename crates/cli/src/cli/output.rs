//! User-facing rendering of a completed run.

use spindle_pipeline::RequestOutcome;

/// Renders the outcome the way it is printed to stdout.
pub fn render_outcome(outcome: &RequestOutcome, write_only: bool) -> String {
    if let Some(answer) = &outcome.answer {
        return answer.clone();
    }

    if write_only {
        return if outcome
            .result
            .created_files
            .iter()
            .any(|f| f == "CHANGES.md")
        {
            "Changes written to CHANGES.md\nReview the file and apply the changes manually."
                .to_string()
        } else {
            "No changes to write (no modifications needed)".to_string()
        };
    }

    let mut sections = Vec::new();

    if !outcome.result.modified_files.is_empty() {
        sections.push(render_list("Modified files", &outcome.result.modified_files));
    }
    if !outcome.result.created_files.is_empty() {
        sections.push(render_list("Created files", &outcome.result.created_files));
    }
    if !outcome.result.deleted_files.is_empty() {
        sections.push(render_list("Deleted files", &outcome.result.deleted_files));
    }

    if sections.is_empty() {
        "No file changes were needed.".to_string()
    } else {
        sections.join("\n\n")
    }
}

fn render_list(title: &str, files: &[String]) -> String {
    let mut out = format!("{}:", title);
    for file in files {
        out.push_str(&format!("\n  - {}", file));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::model::{ApplyResult, Intent};

    fn outcome(result: ApplyResult, answer: Option<String>) -> RequestOutcome {
        RequestOutcome {
            intent: Intent::placeholder(),
            result,
            answer,
        }
    }

    #[test]
    fn test_answer_wins() {
        let rendered = render_outcome(
            &outcome(ApplyResult::default(), Some("It works like this.".to_string())),
            false,
        );
        assert_eq!(rendered, "It works like this.");
    }

    #[test]
    fn test_file_lists() {
        let result = ApplyResult {
            modified_files: vec!["src/a.ts".to_string()],
            deleted_files: vec!["src/old.ts".to_string()],
            created_files: vec!["src/new.ts".to_string()],
        };
        let rendered = render_outcome(&outcome(result, None), false);

        assert!(rendered.contains("Modified files:\n  - src/a.ts"));
        assert!(rendered.contains("Created files:\n  - src/new.ts"));
        assert!(rendered.contains("Deleted files:\n  - src/old.ts"));
    }

    #[test]
    fn test_no_changes() {
        let rendered = render_outcome(&outcome(ApplyResult::default(), None), false);
        assert_eq!(rendered, "No file changes were needed.");
    }

    #[test]
    fn test_write_only_report_present() {
        let result = ApplyResult {
            modified_files: vec![],
            deleted_files: vec![],
            created_files: vec!["CHANGES.md".to_string()],
        };
        let rendered = render_outcome(&outcome(result, None), true);
        assert!(rendered.contains("Changes written to CHANGES.md"));
    }

    #[test]
    fn test_write_only_no_report() {
        let rendered = render_outcome(&outcome(ApplyResult::default(), None), true);
        assert!(rendered.contains("No changes to write"));
    }
}
