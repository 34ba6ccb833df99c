//! Fixed prompt texts

/// Fixed texts used when assembling prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// Built-in system preamble, used when no preamble file is available.
    ///
    /// The selected card's instruction block is appended directly after it.
    pub fn default_preamble() -> &'static str {
        r#"You are TelcoGPT, an assistant for mobile network engineers.
Answer questions about RAN, core, OSS/BSS and devices accurately and concisely.
Cite 3GPP specifications by number when they apply. Never invent parameter values.
Always answer in the five-bullet layout requested by the card below, one bullet per line,
numbered 1. to 5., with no text before the first bullet."#
    }

    /// Corrective instruction appended as an assistant turn after a reply
    /// that failed structural validation.
    pub fn corrective_instruction() -> &'static str {
        "Format error: the previous reply did not follow the required layout. \
Re-answer the question using exactly five numbered bullets (1. to 5.), one per line, \
covering the card topics in order."
    }
}
