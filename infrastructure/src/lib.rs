//! Infrastructure layer for telcard
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, preamble
//! loading, the chat-completions HTTP backend and the JSONL transcript.

pub mod config;
pub mod logging;
pub mod prompt;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileCompletionConfig, FileConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FilePromptConfig, FileReplConfig,
};
pub use logging::JsonlConversationLogger;
pub use prompt::{Preamble, PreambleError, PreambleLoader, PreambleSource};
pub use providers::{BackendSetupError, ChatCompletionsGateway};
