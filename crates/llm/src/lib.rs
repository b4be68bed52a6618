mod assistant;
mod client;
mod genai;
mod mock;
pub mod prompt;
pub mod response;
mod types;

pub use ::genai::adapter::AdapterKind;
pub use assistant::{AssistantOptions, CodeAssistant};
pub use client::LLMClient;
pub use genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use spindle_core::BackendError;
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
