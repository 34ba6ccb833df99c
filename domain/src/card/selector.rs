//! Rule-based card routing
//!
//! A question is tested against an ordered list of cue patterns. The first
//! rule that matches wins; when nothing matches, the default card is used.
//! Routing is therefore total and deterministic.

use super::entities::Card;
use crate::core::error::DomainError;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Definitional cues, checked first
pub const DEFINITION_CUES: &[&str] = &["what is", "define", "explain"];

/// Fault cues, checked second
pub const TROUBLESHOOTING_CUES: &[&str] =
    &["error", "alarm", "fail", "downtime", "outage", "degrade"];

static STANDARD_SELECTOR: LazyLock<CardSelector> = LazyLock::new(CardSelector::standard);

/// Route a question with the built-in rules.
pub fn select_card(question: &str) -> Card {
    STANDARD_SELECTOR.select(question)
}

/// A single routing rule: a case-insensitive whole-word cue pattern and the
/// card it routes to.
#[derive(Debug, Clone)]
pub struct CardRule {
    card: Card,
    pattern: Regex,
}

impl CardRule {
    /// Build a rule matching any of `cues` as whole words, ignoring case.
    ///
    /// Cues are matched literally; multi-word cues must match with single
    /// spaces between words.
    pub fn from_cues(card: Card, cues: &[&str]) -> Result<Self, DomainError> {
        if cues.is_empty() {
            return Err(DomainError::InvalidCardPattern(format!(
                "no cues given for card {}",
                card
            )));
        }
        let alternation = cues
            .iter()
            .map(|cue| regex::escape(cue))
            .collect::<Vec<_>>()
            .join("|");
        Self::from_pattern(card, &format!(r"\b(?:{})\b", alternation))
    }

    /// Build a rule from a raw regular expression (matched case-insensitively).
    pub fn from_pattern(card: Card, pattern: &str) -> Result<Self, DomainError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::InvalidCardPattern(e.to_string()))?;
        Ok(Self { card, pattern })
    }

    pub fn card(&self) -> Card {
        self.card
    }

    pub fn matches(&self, question: &str) -> bool {
        self.pattern.is_match(question)
    }
}

/// Ordered, first-match-wins card router
#[derive(Debug, Clone)]
pub struct CardSelector {
    rules: Vec<CardRule>,
    default_card: Card,
}

impl CardSelector {
    /// Create a selector with no rules; every question routes to `default_card`.
    pub fn new(default_card: Card) -> Self {
        Self {
            rules: Vec::new(),
            default_card,
        }
    }

    /// The built-in routing: Definition cues, then Troubleshooting cues,
    /// falling back to Design.
    pub fn standard() -> Self {
        let definition = CardRule::from_cues(Card::Definition, DEFINITION_CUES)
            .expect("definition cues are valid");
        let troubleshooting = CardRule::from_cues(Card::Troubleshooting, TROUBLESHOOTING_CUES)
            .expect("troubleshooting cues are valid");

        Self::new(Card::Design)
            .with_rule(definition)
            .with_rule(troubleshooting)
    }

    /// Append a rule. It is evaluated after every rule already present.
    pub fn with_rule(mut self, rule: CardRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[CardRule] {
        &self.rules
    }

    pub fn default_card(&self) -> Card {
        self.default_card
    }

    /// Route a question to a card.
    pub fn select(&self, question: &str) -> Card {
        self.rules
            .iter()
            .find(|rule| rule.matches(question))
            .map(CardRule::card)
            .unwrap_or(self.default_card)
    }
}

impl Default for CardSelector {
    fn default() -> Self {
        Self::standard()
    }
}
