//! Domain layer for telcard
//!
//! This crate contains the request pipeline's pure logic. It performs no I/O
//! and has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Cards
//!
//! A card is a fixed response template asking the model for five bullets on
//! a given set of topics. Questions are routed to a card by ordered cue rules
//! (first match wins, Design when nothing matches).
//!
//! ## Prompts
//!
//! A prompt is the system turn (preamble + card instructions), the prior
//! user/assistant history, and the new question.
//!
//! ## Validation
//!
//! Replies are checked for shape only: at least five bulleted lines once any
//! markup is stripped.

pub mod card;
pub mod config;
pub mod core;
pub mod prompt;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use card::{Card, CardRule, CardSelector, select_card};
pub use config::OutputFormat;
pub use crate::core::{error::DomainError, model::Model, question::Question};
pub use prompt::{PromptAssembler, PromptTemplate};
pub use session::entities::{Message, Role};
pub use validation::{REQUIRED_BULLETS, ReplyValidator, count_bullets, is_valid_reply};
