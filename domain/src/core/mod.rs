//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - backend model identifiers
//! - [`question::Question`] - a validated, non-blank user question
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod question;
pub mod string;
