pub mod chat;
pub mod priming;
pub mod prompts;
pub mod providers;

pub use chat::{AstrologerChat, ChatRequest};
pub use priming::build_priming_pair;
pub use providers::{
    ChatMessage, ChatRole, GeminiProvider, GenerationConfig, LlmProvider, LlmRequest, LlmResponse,
    ModelInfo, Usage,
};
