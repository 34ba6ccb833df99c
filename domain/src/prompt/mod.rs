//! Prompt domain
//!
//! Fixed prompt texts and the assembler that turns a card, prior history and
//! a new question into the message sequence sent to the backend.

mod assembler;
mod template;

pub use assembler::PromptAssembler;
pub use template::PromptTemplate;
