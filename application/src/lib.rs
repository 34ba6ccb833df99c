//! Application layer for telcard
//!
//! This crate contains the answer use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::CompletionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{AnswerProgressNotifier, NoAnswerProgress},
};
pub use use_cases::run_answer::{
    AnswerOutcome, RunAnswerError, RunAnswerInput, RunAnswerUseCase,
};
