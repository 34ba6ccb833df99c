//! Output format value object

use serde::{Deserialize, Serialize};

/// How an answer is rendered for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Card, backend call count and the answer
    Full,
    /// Only the answer text (default)
    Answer,
    /// JSON output
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Answer
    }
}
