//! Prompt resources loaded from disk.

mod preamble;

pub use preamble::{DEFAULT_PREAMBLE_PATH, Preamble, PreambleError, PreambleLoader, PreambleSource};
