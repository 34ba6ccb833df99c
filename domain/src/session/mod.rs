//! Conversation domain.
//!
//! - [`entities::Message`] - a single role-tagged turn sent to the backend
//! - [`entities::Role`] - system, user or assistant

pub mod entities;
