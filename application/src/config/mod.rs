//! Application-level configuration.
//!
//! - [`CompletionParams`] - model, temperatures and timeout for backend calls

pub mod completion_params;

pub use completion_params::{CompletionParams, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
