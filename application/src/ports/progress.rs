//! Progress notification port
//!
//! Lets the presentation layer follow a request as it moves through card
//! selection and the (at most two) backend calls.

use telcard_domain::Card;

/// Callback for progress updates while answering a question
pub trait AnswerProgressNotifier: Send + Sync {
    /// Called once the question has been routed to a card
    fn on_card_selected(&self, card: Card);

    /// Called before backend call number `attempt` (1 or 2)
    fn on_attempt_start(&self, attempt: u8);

    /// Called after backend call `attempt` returns; `valid` is `None` for the
    /// corrective attempt, whose reply is not validated
    fn on_attempt_complete(&self, attempt: u8, valid: Option<bool>);

    /// Called when a backend call fails
    fn on_attempt_failed(&self, _attempt: u8, _error: &str) {}
}

/// No-op progress notifier
pub struct NoAnswerProgress;

impl AnswerProgressNotifier for NoAnswerProgress {
    fn on_card_selected(&self, _card: Card) {}
    fn on_attempt_start(&self, _attempt: u8) {}
    fn on_attempt_complete(&self, _attempt: u8, _valid: Option<bool>) {}
}
