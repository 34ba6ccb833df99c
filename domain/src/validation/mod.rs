//! Reply validation.

pub mod reply;

pub use reply::{REQUIRED_BULLETS, ReplyValidator, count_bullets, is_valid_reply, strip_markup};
