//! Interactive chat module
//!
//! A line-editor chat that carries the conversation into each request.

mod repl;

pub use repl::{ChatCommand, ChatRepl, ChatSession};
