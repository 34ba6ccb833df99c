//! Prompt assembly
//!
//! Layout of an assembled prompt:
//!
//! | index            | role      | content                         |
//! |------------------|-----------|---------------------------------|
//! | 0                | system    | preamble + card instructions    |
//! | 1, 3, 5, ...     | user      | history[0], history[2], ...     |
//! | 2, 4, 6, ...     | assistant | history[1], history[3], ...     |
//! | last             | user      | the new question                |

use super::template::PromptTemplate;
use crate::card::Card;
use crate::session::entities::Message;
use std::sync::Arc;

/// Builds the message sequence for one request.
///
/// Holds only the system preamble, which is loaded once and shared across
/// requests. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    preamble: Arc<str>,
}

impl PromptAssembler {
    pub fn new(preamble: impl Into<Arc<str>>) -> Self {
        Self {
            preamble: preamble.into(),
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// System turn content for a card
    pub fn system_content(&self, card: Card) -> String {
        format!("{}{}", self.preamble, card.instructions())
    }

    /// Assemble the prompt for `user_message`.
    ///
    /// `history` alternates user/assistant entries, oldest first. A trailing
    /// unpaired entry is dropped so that roles keep alternating.
    pub fn build(&self, card: Card, history: &[String], user_message: &str) -> Vec<Message> {
        let paired = history.len() - history.len() % 2;

        let mut messages = Vec::with_capacity(paired + 2);
        messages.push(Message::system(self.system_content(card)));

        for pair in history[..paired].chunks_exact(2) {
            messages.push(Message::user(pair[0].as_str()));
            messages.push(Message::assistant(pair[1].as_str()));
        }

        messages.push(Message::user(user_message));
        messages
    }

    /// Append the corrective turn issued after a malformed reply.
    pub fn append_corrective_turn(&self, messages: &mut Vec<Message>) {
        messages.push(Message::assistant(PromptTemplate::corrective_instruction()));
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(PromptTemplate::default_preamble())
    }
}
