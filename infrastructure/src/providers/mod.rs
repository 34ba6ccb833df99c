//! Backend adapters implementing the [`LlmGateway`](telcard_application::LlmGateway) port.

mod chat_completions;

pub use chat_completions::{BackendSetupError, ChatCompletionsGateway};
