//! The understanding/generation service consumed by the pipeline.
//!
//! `CodeAssistant` wraps an [`LLMClient`] with the five request/response
//! operations the pipeline needs: intent analysis, change generation, file
//! rewriting, answering, and discovery relevance filtering. Structured
//! operations embed a JSON schema in the prompt and validate what comes
//! back; a malformed structured response is fatal for the calling phase.

use crate::client::LLMClient;
use crate::prompt;
use crate::response;
use crate::types::{ChatMessage, LLMRequest};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use spindle_core::model::{Change, ChangeOperation, ChangeSet, FileRecord, Intent, RelevantPaths};
use spindle_core::BackendError;
use std::sync::Arc;
use tracing::debug;

const STRUCTURED_SYSTEM_PROMPT: &str = "You must respond with valid JSON that matches the provided schema. \
     Do not include any text outside the JSON response. \
     Do not wrap the JSON in markdown code blocks or use ``` formatting.";

const REWRITE_SYSTEM_PROMPT: &str = "You are a code rewriting assistant. Return only the complete rewritten \
     file content without any additional formatting or explanation.";

const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful software engineering assistant. Provide clear, \
     accurate, and detailed answers based on the code analysis provided.";

#[derive(Debug, Clone)]
pub struct AssistantOptions {
    /// Per-file preview cap applied when rendering prompts.
    pub max_preview_lines: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            max_preview_lines: 200,
            temperature: 0.0,
            max_tokens: 8000,
        }
    }
}

pub struct CodeAssistant {
    client: Arc<dyn LLMClient>,
    options: AssistantOptions,
}

impl CodeAssistant {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self::with_options(client, AssistantOptions::default())
    }

    pub fn with_options(client: Arc<dyn LLMClient>, options: AssistantOptions) -> Self {
        Self { client, options }
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, BackendError> {
        let request = LLMRequest::new(messages)
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens);

        let response = self.client.chat(request).await?;
        Ok(response.content)
    }

    async fn complete_structured<T>(&self, prompt: String, name: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = schemars::schema_for!(T);
        let schema_json = serde_json::to_string_pretty(&schema).map_err(|e| {
            BackendError::other(format!("failed to render {} schema: {}", name, e))
        })?;

        let system = format!("{}\n\nSchema:\n{}", STRUCTURED_SYSTEM_PROMPT, schema_json);
        let content = self
            .complete(vec![ChatMessage::system(system), ChatMessage::user(prompt)])
            .await?;

        response::parse_structured(&content, name)
    }

    /// Determines what the requester wants from the prompt and the current
    /// working file set.
    pub async fn analyze_intent(
        &self,
        user_prompt: &str,
        files: &[FileRecord],
        tree: Option<&str>,
    ) -> Result<Intent, BackendError> {
        let prompt = prompt::intent_prompt(user_prompt, files, tree, self.options.max_preview_lines);
        let intent: Intent = self.complete_structured(prompt, "intent").await?;

        intent
            .validate()
            .map_err(|e| BackendError::invalid_response(e.to_string()))?;

        debug!(
            mode = ?intent.mode,
            needs_more_context = intent.needs_more_context,
            "Intent analyzed"
        );
        Ok(intent)
    }

    /// Produces the typed change set implementing the intent.
    pub async fn generate_changes(
        &self,
        user_prompt: &str,
        intent: &Intent,
        files: &[FileRecord],
        tree: Option<&str>,
    ) -> Result<Vec<Change>, BackendError> {
        let prompt = prompt::changes_prompt(
            user_prompt,
            intent,
            files,
            tree,
            self.options.max_preview_lines,
        );
        let mut change_set: ChangeSet = self.complete_structured(prompt, "changes").await?;

        change_set
            .validate()
            .map_err(|e| BackendError::invalid_response(e.to_string()))?;

        for change in &mut change_set.changes {
            change.normalize();
        }

        Ok(change_set.changes)
    }

    /// Rewrites one file's content by applying all of its changes at once.
    /// The change group must not be a delete group; deletes are pure file
    /// system operations.
    pub async fn apply_file_changes(
        &self,
        changes: &[Change],
        current_content: &str,
    ) -> Result<String, BackendError> {
        if changes
            .iter()
            .any(|c| c.operation == ChangeOperation::DeleteFile)
        {
            return Err(BackendError::other(
                "delete operations are not handled by the rewrite service",
            ));
        }
        if changes.is_empty() {
            return Err(BackendError::other("empty change group"));
        }

        let prompt = prompt::rewrite_prompt(changes, current_content);
        let content = self
            .complete(vec![
                ChatMessage::system(REWRITE_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .await?;

        Ok(response::strip_code_fences(content.trim()))
    }

    /// Answers an ask-mode request from the analyzed context.
    pub async fn generate_answer(
        &self,
        user_prompt: &str,
        intent: &Intent,
        files: &[FileRecord],
        tree: Option<&str>,
    ) -> Result<String, BackendError> {
        let prompt = prompt::answer_prompt(
            user_prompt,
            intent,
            files,
            tree,
            self.options.max_preview_lines,
        );
        let content = self
            .complete(vec![
                ChatMessage::system(ANSWER_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .await?;

        Ok(content.trim().to_string())
    }

    /// Reduces discovered candidate paths to the ones relevant to the
    /// intent. Only paths from the candidate list are honored.
    pub async fn filter_relevant_paths(
        &self,
        intent: &Intent,
        candidates: &[String],
    ) -> Result<Vec<String>, BackendError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompt::filter_paths_prompt(intent, candidates);
        let relevant: RelevantPaths = self.complete_structured(prompt, "relevant_paths").await?;

        Ok(relevant
            .file_paths
            .into_iter()
            .filter(|path| candidates.contains(path))
            .collect())
    }
}

impl std::fmt::Debug for CodeAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeAssistant")
            .field("client", &self.client.name())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockLLMClient, MockResponse};
    use spindle_core::model::{IntentMode, ModificationType};

    fn assistant_with(responses: Vec<MockResponse>) -> CodeAssistant {
        let client = MockLLMClient::new();
        client.add_responses(responses);
        CodeAssistant::new(Arc::new(client))
    }

    fn intent_json(mode: &str, needs_more_context: bool) -> serde_json::Value {
        serde_json::json!({
            "mode": mode,
            "description": "Add a logging wrapper around the auth module",
            "needs_more_context": needs_more_context,
            "file_paths": ["src/auth.ts"],
            "search_terms": ["login"],
        })
    }

    #[tokio::test]
    async fn test_analyze_intent() {
        let assistant =
            assistant_with(vec![MockResponse::json(&intent_json("edit", false))]);

        let intent = assistant.analyze_intent("wrap auth in logging", &[], None).await.unwrap();
        assert_eq!(intent.mode, IntentMode::Edit);
        assert_eq!(intent.file_paths, vec!["src/auth.ts"]);
    }

    #[tokio::test]
    async fn test_analyze_intent_rejects_short_description() {
        let assistant = assistant_with(vec![MockResponse::json(&serde_json::json!({
            "mode": "edit",
            "description": "short",
            "needs_more_context": false,
            "file_paths": [],
            "search_terms": [],
        }))]);

        let result = assistant.analyze_intent("prompt", &[], None).await;
        assert!(matches!(result, Err(BackendError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_analyze_intent_rejects_unknown_mode() {
        let assistant =
            assistant_with(vec![MockResponse::json(&intent_json("review", false))]);

        let result = assistant.analyze_intent("prompt", &[], None).await;
        assert!(matches!(result, Err(BackendError::ParseError { .. })));
    }

    #[tokio::test]
    async fn test_generate_changes_normalizes_deletes() {
        let assistant = assistant_with(vec![MockResponse::json(&serde_json::json!({
            "changes": [{
                "operation": "delete_file",
                "file_path": "src/old.ts",
                "modification_type": "replace_block",
                "modification_description": "drop it",
                "old_code_block": "stale",
                "new_code_block": "stale",
            }]
        }))]);

        let intent = Intent {
            mode: IntentMode::Edit,
            description: "Remove the obsolete module".to_string(),
            needs_more_context: false,
            file_paths: vec![],
            search_terms: vec![],
        };

        let changes = assistant
            .generate_changes("remove old module", &intent, &[], None)
            .await
            .unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].modification_type, ModificationType::None);
        assert!(changes[0].old_code_block.is_empty());
        assert!(changes[0].new_code_block.is_empty());
    }

    #[tokio::test]
    async fn test_apply_file_changes_strips_fences() {
        let assistant = assistant_with(vec![MockResponse::text(
            "```typescript\nconst x = 1;\n```",
        )]);

        let changes = vec![Change::new_file("src/new.ts", "create", "const x = 1;")];
        let content = assistant.apply_file_changes(&changes, "").await.unwrap();
        assert_eq!(content, "const x = 1;");
    }

    #[tokio::test]
    async fn test_apply_file_changes_refuses_deletes() {
        let assistant = assistant_with(vec![]);
        let changes = vec![Change::delete_file("src/old.ts")];

        let result = assistant.apply_file_changes(&changes, "").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_filter_relevant_paths_intersects_candidates() {
        let assistant = assistant_with(vec![MockResponse::json(&serde_json::json!({
            "file_paths": ["/p/a.ts", "/p/invented.ts"],
        }))]);

        let intent = Intent {
            mode: IntentMode::Edit,
            description: "Trace the login flow end to end".to_string(),
            needs_more_context: true,
            file_paths: vec![],
            search_terms: vec![],
        };
        let candidates = vec!["/p/a.ts".to_string(), "/p/b.ts".to_string()];

        let relevant = assistant
            .filter_relevant_paths(&intent, &candidates)
            .await
            .unwrap();
        assert_eq!(relevant, vec!["/p/a.ts"]);
    }

    #[tokio::test]
    async fn test_filter_relevant_paths_short_circuits_on_empty() {
        // No queued responses: a chat call would error.
        let assistant = assistant_with(vec![]);
        let intent = Intent::placeholder();

        let relevant = assistant.filter_relevant_paths(&intent, &[]).await.unwrap();
        assert!(relevant.is_empty());
    }

    #[tokio::test]
    async fn test_generate_answer_trims() {
        let assistant = assistant_with(vec![MockResponse::text("  The auth flow works.  ")]);
        let intent = Intent {
            mode: IntentMode::Ask,
            description: "Explain how the auth flow works".to_string(),
            needs_more_context: false,
            file_paths: vec![],
            search_terms: vec![],
        };

        let answer = assistant
            .generate_answer("how does auth work?", &intent, &[], None)
            .await
            .unwrap();
        assert_eq!(answer, "The auth flow works.");
    }
}
