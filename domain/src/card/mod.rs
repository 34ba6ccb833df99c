//! Card domain
//!
//! - [`entities::Card`] - the fixed response templates
//! - [`selector::CardSelector`] - ordered cue rules that route a question to a card

pub mod entities;
pub mod selector;

pub use entities::Card;
pub use selector::{CardRule, CardSelector, select_card};
