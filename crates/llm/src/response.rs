//! Extraction of structured payloads from raw LLM responses.
//!
//! Models are told to answer with bare JSON, but in practice responses
//! arrive wrapped in markdown fences or surrounded by prose. These helpers
//! recover the payload before serde gets involved.

use regex::Regex;
use spindle_core::BackendError;

/// Pulls a JSON object out of a raw response.
pub fn extract_json(response: &str) -> Result<String, BackendError> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    if trimmed.contains("```") {
        return extract_from_markdown_block(trimmed);
    }

    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if start < end {
                return Ok(trimmed[start..=end].to_string());
            }
        }
    }

    Err(BackendError::invalid_response(
        "No JSON object found in response",
    ))
}

fn extract_from_markdown_block(text: &str) -> Result<String, BackendError> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").unwrap();

    if let Some(captures) = re.captures(text) {
        if let Some(json_match) = captures.get(1) {
            let json = json_match.as_str().trim();
            if json.starts_with('{') && json.ends_with('}') {
                return Ok(json.to_string());
            }
        }
    }

    Err(BackendError::invalid_response(
        "Could not extract JSON from markdown block",
    ))
}

/// Strips a single surrounding markdown code fence from free-text output,
/// as returned by the rewrite collaborator.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();

    let without_open = Regex::new(r"^```[\w]*\n?")
        .unwrap()
        .replace(trimmed, "");
    let without_close = Regex::new(r"\n?```$").unwrap().replace(&without_open, "");

    without_close.into_owned()
}

/// Parses a structured response into `T`, tolerating fences and prose.
pub fn parse_structured<T: serde::de::DeserializeOwned>(
    response: &str,
    context: &str,
) -> Result<T, BackendError> {
    let json = extract_json(response)?;
    serde_json::from_str(&json).map_err(|e| BackendError::ParseError {
        message: e.to_string(),
        context: format!("{}: {}", context, json.chars().take(120).collect::<String>()),
    })
}
