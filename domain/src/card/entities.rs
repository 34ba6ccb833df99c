//! Response cards

use serde::{Deserialize, Serialize};

/// A fixed response template (Value Object)
///
/// Every card asks the model for exactly five numbered bullets; the cards
/// differ only in which five topics they require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    /// "What is X" style questions
    Definition,
    /// Faults, alarms and outages
    Troubleshooting,
    /// Everything else
    Design,
}

impl Card {
    /// All cards in routing order
    pub const ALL: [Card; 3] = [Card::Definition, Card::Troubleshooting, Card::Design];

    /// Card name as it appears in the `<<CARD=...>>` marker
    pub fn name(&self) -> &'static str {
        match self {
            Card::Definition => "Definition",
            Card::Troubleshooting => "Troubleshooting",
            Card::Design => "Design",
        }
    }

    /// The five bullet topics, in the order the model must answer them
    pub fn topics(&self) -> [&'static str; 5] {
        match self {
            Card::Definition => [
                "Concept <=30 words",
                "Technology domain (RAN | OSS/BSS | Device)",
                "3GPP spec ref",
                "Key parameters (<5)",
                "Typical Use cases",
            ],
            Card::Troubleshooting => [
                "Root Cause(s)",
                "Impact on Network",
                "KPIs affected",
                "Recommended Fix",
                "Fallback",
            ],
            Card::Design => [
                "Objective",
                "Required Inputs",
                "Best Practice / Formula",
                "Example",
                "Standards",
            ],
        }
    }

    /// Instruction block appended to the system preamble
    pub fn instructions(&self) -> &'static str {
        match self {
            Card::Definition => {
                r#" <<CARD=Definition>>
Return exactly five bullets:

1. Concept <=30 words
2. Technology domain (RAN | OSS/BSS | Device)
3. 3GPP spec ref
4. Key parameters (<5)
5. Typical Use cases
"#
            }
            Card::Troubleshooting => {
                r#" <<CARD=Troubleshooting>>
Return exactly five bullets:

1. Root Cause(s)
2. Impact on Network
3. KPIs affected
4. Recommended Fix
5. Fallback
"#
            }
            Card::Design => {
                r#" <<CARD=Design>>
Return exactly five bullets:

1. Objective
2. Required Inputs
3. Best Practice / Formula
4. Example
5. Standards
"#
            }
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::ALL
            .into_iter()
            .find(|card| card.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown card: {}", s))
    }
}
