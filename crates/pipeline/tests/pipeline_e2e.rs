//! End-to-end pipeline runs against a real temporary project with a
//! scripted LLM.

use spindle_core::model::FileRecord;
use spindle_core::{NoOpHandler, RealFileSystem};
use spindle_llm::{CodeAssistant, MockLLMClient, MockResponse};
use spindle_pipeline::pipeline::phases::ReadFilesPhase;
use spindle_pipeline::pipeline::Phase;
use spindle_pipeline::{
    process_request, ApplyMode, ContentSearch, PipelineContext, PipelineLimits, PipelineServices,
    SemanticParser,
};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(
        temp.path().join("src/auth.ts"),
        "export function login(user: string) {\n  return user;\n}\n",
    )
    .unwrap();
    temp
}

fn services_with(responses: Vec<MockResponse>) -> PipelineServices {
    let client = MockLLMClient::new();
    client.add_responses(responses);

    PipelineServices {
        assistant: Arc::new(CodeAssistant::new(Arc::new(client))),
        fs: Arc::new(RealFileSystem::new()),
        search: Arc::new(ContentSearch::new(Duration::from_secs(5), 50)),
        parser: Arc::new(SemanticParser::new()),
        progress: Arc::new(NoOpHandler),
    }
}

fn intent_response(
    mode: &str,
    needs_more_context: bool,
    file_paths: Vec<&str>,
    search_terms: Vec<&str>,
) -> MockResponse {
    MockResponse::json(&serde_json::json!({
        "mode": mode,
        "description": "Work out what the request needs and do it",
        "needs_more_context": needs_more_context,
        "file_paths": file_paths,
        "search_terms": search_terms,
    }))
}

#[tokio::test]
async fn test_edit_flow_modifies_seed_file() {
    let temp = project();

    let responses = vec![
        intent_response("edit", false, vec![], vec![]),
        MockResponse::json(&serde_json::json!({
            "changes": [{
                "operation": "modify_file",
                "file_path": "src/auth.ts",
                "modification_type": "add_block",
                "modification_description": "add a logout function",
                "old_code_block": "",
                "new_code_block": "export function logout() {}",
            }]
        })),
        MockResponse::text(
            "export function login(user: string) {\n  return user;\n}\nexport function logout() {}\n",
        ),
    ];

    let outcome = process_request(
        "add a logout function",
        vec!["src/auth.ts".to_string()],
        temp.path().to_path_buf(),
        ApplyMode::Direct,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap();

    assert!(outcome.intent.is_edit());
    assert_eq!(outcome.result.modified_files, vec!["src/auth.ts"]);
    assert!(outcome.result.created_files.is_empty());
    assert!(outcome.answer.is_none());

    let content = fs::read_to_string(temp.path().join("src/auth.ts")).unwrap();
    assert!(content.contains("logout"));
}

#[tokio::test]
async fn test_edit_flow_creates_new_file() {
    let temp = project();

    let responses = vec![
        intent_response("edit", false, vec![], vec![]),
        MockResponse::json(&serde_json::json!({
            "changes": [{
                "operation": "new_file",
                "file_path": "src/new.ts",
                "modification_type": "add_block",
                "modification_description": "session helper",
                "old_code_block": "",
                "new_code_block": "export const session = {};",
            }]
        })),
        MockResponse::text("export const session = {};"),
    ];

    let outcome = process_request(
        "add a session helper module",
        vec!["src/auth.ts".to_string()],
        temp.path().to_path_buf(),
        ApplyMode::Direct,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.result.created_files, vec!["src/new.ts"]);
    assert_eq!(
        fs::read_to_string(temp.path().join("src/new.ts")).unwrap(),
        "export const session = {};"
    );
}

#[tokio::test]
async fn test_ask_flow_answers_without_touching_files() {
    let temp = project();
    let before = fs::read_to_string(temp.path().join("src/auth.ts")).unwrap();

    let responses = vec![
        intent_response("ask", false, vec![], vec![]),
        MockResponse::text("login takes a user and returns it unchanged."),
    ];

    let outcome = process_request(
        "what does login do?",
        vec!["src/auth.ts".to_string()],
        temp.path().to_path_buf(),
        ApplyMode::Direct,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap();

    assert!(!outcome.intent.is_edit());
    assert!(outcome.result.is_empty());
    assert_eq!(
        outcome.answer.as_deref(),
        Some("login takes a user and returns it unchanged.")
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("src/auth.ts")).unwrap(),
        before
    );
}

#[tokio::test]
async fn test_expansion_branch_discovers_and_edits() {
    let temp = project();
    fs::write(
        temp.path().join("src/session.ts"),
        "export function refreshSession() {}\n",
    )
    .unwrap();

    let discovered_path = temp.path().join("src/session.ts").display().to_string();

    let responses = vec![
        intent_response("edit", true, vec![], vec!["refreshSession"]),
        // relevance filter over the discovered candidates
        MockResponse::json(&serde_json::json!({ "file_paths": [discovered_path] })),
        MockResponse::json(&serde_json::json!({
            "changes": [{
                "operation": "modify_file",
                "file_path": "src/session.ts",
                "modification_type": "add_block",
                "modification_description": "log refreshes",
                "old_code_block": "",
                "new_code_block": "console.log(\"refresh\");",
            }]
        })),
        MockResponse::text(
            "export function refreshSession() {\n  console.log(\"refresh\");\n}\n",
        ),
    ];

    let outcome = process_request(
        "log every session refresh",
        vec!["src/auth.ts".to_string()],
        temp.path().to_path_buf(),
        ApplyMode::Direct,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.result.modified_files, vec!["src/session.ts"]);
    let content = fs::read_to_string(temp.path().join("src/session.ts")).unwrap();
    assert!(content.contains("console.log"));
}

#[tokio::test]
async fn test_write_only_mode_produces_report() {
    let temp = project();
    let before = fs::read_to_string(temp.path().join("src/auth.ts")).unwrap();

    let responses = vec![
        intent_response("edit", false, vec![], vec![]),
        MockResponse::json(&serde_json::json!({
            "changes": [{
                "operation": "modify_file",
                "file_path": "src/auth.ts",
                "modification_type": "replace_block",
                "modification_description": "harden login",
                "old_code_block": "return user;",
                "new_code_block": "return sanitize(user);",
            }]
        })),
    ];

    let outcome = process_request(
        "harden the login function",
        vec!["src/auth.ts".to_string()],
        temp.path().to_path_buf(),
        ApplyMode::ReportOnly,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.result.created_files, vec!["CHANGES.md"]);
    assert!(outcome.result.modified_files.is_empty());

    // source untouched, report present
    assert_eq!(
        fs::read_to_string(temp.path().join("src/auth.ts")).unwrap(),
        before
    );
    let report = fs::read_to_string(temp.path().join("CHANGES.md")).unwrap();
    assert!(report.contains("## File: src/auth.ts"));
    assert!(report.contains("return sanitize(user);"));
}

#[tokio::test]
async fn test_malformed_intent_output_is_fatal() {
    let temp = project();

    let responses = vec![MockResponse::text("I would rather chat about the weather")];

    let error = process_request(
        "add a logout function",
        vec!["src/auth.ts".to_string()],
        temp.path().to_path_buf(),
        ApplyMode::Direct,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap_err();

    assert!(error.to_string().contains("Phase IntentPhase failed"));
}

#[tokio::test]
async fn test_unreadable_seed_files_are_dropped_not_fatal() {
    let temp = project();

    let responses = vec![
        intent_response("ask", false, vec![], vec![]),
        MockResponse::text("Only one file was readable."),
    ];

    let outcome = process_request(
        "what is in these files?",
        vec![
            "src/auth.ts".to_string(),
            "src/does-not-exist.ts".to_string(),
        ],
        temp.path().to_path_buf(),
        ApplyMode::Direct,
        services_with(responses),
        PipelineLimits::default(),
    )
    .await
    .unwrap();

    assert!(outcome.answer.is_some());
}

#[tokio::test]
async fn test_read_phase_reentry_is_idempotent() {
    let temp = project();

    let mut context = PipelineContext::new(
        "inspect the cached record",
        vec![],
        temp.path().to_path_buf(),
        services_with(vec![]),
        PipelineLimits::default(),
    );

    // A record that already has content for a path that does not exist on
    // disk: a re-read attempt would drop it.
    context
        .files
        .push(FileRecord::with_content("src/ghost.ts", "cached content"));

    let phase = ReadFilesPhase;
    phase.execute(&mut context).await.unwrap();
    phase.execute(&mut context).await.unwrap();

    assert_eq!(context.files.len(), 1);
    assert_eq!(context.files[0].content.as_deref(), Some("cached content"));
}
