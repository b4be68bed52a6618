use thiserror::Error;

/// Errors surfaced by LLM transport and structured-response handling.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API error{}: {message}", .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("request timed out after {seconds} seconds")]
    TimeoutError { seconds: u64 },

    #[error("invalid response from LLM: {message}")]
    InvalidResponse { message: String },

    #[error("parse error: {message} (context: {context})")]
    ParseError { message: String, context: String },

    #[error("configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl BackendError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        BackendError::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        BackendError::Other {
            message: message.into(),
        }
    }
}
