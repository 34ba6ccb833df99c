//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Invalid card pattern: {0}")]
    InvalidCardPattern(String),
}

impl DomainError {
    /// Check if this error was caused by user input rather than configuration
    pub fn is_user_error(&self) -> bool {
        matches!(self, DomainError::EmptyQuestion)
    }
}
