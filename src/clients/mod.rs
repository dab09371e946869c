pub mod document_client;
pub mod llm_client;

pub use document_client::{DocumentIntelligenceClient, TextExtractor};
pub use llm_client::{ChatMessage, ChatRole, CompletionService, LlmClient};
