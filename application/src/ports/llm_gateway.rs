//! LLM Gateway port
//!
//! Defines the interface for calling the chat-completions backend.

use async_trait::async_trait;
use std::time::Duration;
use telcard_domain::{Message, Model};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }
}

/// A single completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub model: Model,
    /// `None` leaves the sampling temperature to the backend.
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the backend.
/// Implementations (adapters) live in the infrastructure layer; tests use
/// scripted fakes.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the whole conversation and return the reply text.
    ///
    /// Dropping the returned future must abort the in-flight call.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}
