//! Configuration loaded from `SPINDLE_*` environment variables.
//!
//! - `SPINDLE_PROVIDER`: LLM provider (ollama|openai|claude|gemini|grok|groq) - default: "ollama"
//! - `SPINDLE_MODEL`: model name - default: provider-specific
//! - `SPINDLE_REQUEST_TIMEOUT`: LLM request timeout in seconds - default: "60"
//! - `SPINDLE_SEARCH_TIMEOUT`: content-search timeout in seconds - default: "10"
//! - `SPINDLE_MAX_PREVIEW_LINES`: per-file preview cap in prompts - default: "200"
//! - `SPINDLE_TREE_MAX_FILES`: project-tree file cap - default: "100"
//! - `SPINDLE_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials and endpoints are read by the genai library through
//! its standard variables (OLLAMA_HOST, OPENAI_API_KEY, ANTHROPIC_API_KEY,
//! GOOGLE_API_KEY, XAI_API_KEY, GROQ_API_KEY).

use genai::adapter::AdapterKind;
use std::env;
use thiserror::Error;

const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_PREVIEW_LINES: usize = 200;
const DEFAULT_TREE_MAX_FILES: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, claude, gemini, grok, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    match name.to_lowercase().as_str() {
        "ollama" => Ok(AdapterKind::Ollama),
        "openai" => Ok(AdapterKind::OpenAI),
        "claude" | "anthropic" => Ok(AdapterKind::Anthropic),
        "gemini" => Ok(AdapterKind::Gemini),
        "grok" | "xai" => Ok(AdapterKind::Xai),
        "groq" => Ok(AdapterKind::Groq),
        other => Err(ConfigError::InvalidProvider(other.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct SpindleConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub request_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub max_preview_lines: usize,
    pub tree_max_files: usize,
    pub log_level: String,
}

impl Default for SpindleConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    fn default() -> Self {
        let provider = env::var("SPINDLE_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::Ollama);

        let model = env::var("SPINDLE_MODEL")
            .ok()
            .unwrap_or_else(|| match provider {
                AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL.to_string(),
                _ => "default-model".to_string(),
            });

        let request_timeout_secs = env::var("SPINDLE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let search_timeout_secs = env::var("SPINDLE_SEARCH_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT_SECS);

        let max_preview_lines = env::var("SPINDLE_MAX_PREVIEW_LINES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_PREVIEW_LINES);

        let tree_max_files = env::var("SPINDLE_TREE_MAX_FILES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_TREE_MAX_FILES);

        let log_level = env::var("SPINDLE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            request_timeout_secs,
            search_timeout_secs,
            max_preview_lines,
            tree_max_files,
            log_level,
        }
    }
}

impl SpindleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 3600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.search_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Search timeout must be at least 1 second".to_string(),
            ));
        }
        if self.search_timeout_secs > 300 {
            return Err(ConfigError::ValidationFailed(
                "Search timeout cannot exceed 5 minutes".to_string(),
            ));
        }

        if self.max_preview_lines == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max preview lines must be at least 1".to_string(),
            ));
        }

        if self.tree_max_files == 0 {
            return Err(ConfigError::ValidationFailed(
                "Tree max files must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_spindle_env() {
        for key in [
            "SPINDLE_PROVIDER",
            "SPINDLE_MODEL",
            "SPINDLE_REQUEST_TIMEOUT",
            "SPINDLE_SEARCH_TIMEOUT",
            "SPINDLE_MAX_PREVIEW_LINES",
            "SPINDLE_TREE_MAX_FILES",
            "SPINDLE_LOG_LEVEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_spindle_env();
        let config = SpindleConfig::default();

        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.search_timeout_secs, 10);
        assert_eq!(config.max_preview_lines, 200);
        assert_eq!(config.tree_max_files, 100);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_spindle_env();
        env::set_var("SPINDLE_PROVIDER", "openai");
        env::set_var("SPINDLE_MODEL", "gpt-4.1");
        env::set_var("SPINDLE_REQUEST_TIMEOUT", "120");
        env::set_var("SPINDLE_LOG_LEVEL", "DEBUG");

        let config = SpindleConfig::default();
        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.log_level, "debug");

        clear_spindle_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_fall_back() {
        clear_spindle_env();
        env::set_var("SPINDLE_PROVIDER", "skynet");
        env::set_var("SPINDLE_REQUEST_TIMEOUT", "not-a-number");

        let config = SpindleConfig::default();
        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.request_timeout_secs, 60);

        clear_spindle_env();
    }

    #[test]
    fn test_parse_provider() {
        assert!(parse_provider("ollama").is_ok());
        assert!(parse_provider("OpenAI").is_ok());
        assert!(parse_provider("claude").is_ok());
        assert!(parse_provider("gemini").is_ok());
        assert!(parse_provider("grok").is_ok());
        assert!(parse_provider("groq").is_ok());
        assert!(parse_provider("skynet").is_err());
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_values() {
        clear_spindle_env();
        let mut config = SpindleConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = SpindleConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = SpindleConfig::default();
        config.model = " ".to_string();
        assert!(config.validate().is_err());
    }
}
