pub mod llm_client;

pub use llm_client::{
    Completion, CompletionBackend, CompletionRequest, LlmClient, TokenUsage, DEFAULT_TEMPERATURE,
};
