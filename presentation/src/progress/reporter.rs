//! Progress reporting while an answer is being produced

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use telcard_application::ports::progress::AnswerProgressNotifier;
use telcard_domain::Card;

/// Spinner that follows card selection and backend calls
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    card: Mutex<Option<Card>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            card: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn attempt_label(attempt: u8) -> &'static str {
        if attempt > 1 {
            "Requesting corrected answer..."
        } else {
            "Waiting for the model..."
        }
    }

    fn prefix(&self) -> String {
        match *self.card.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(card) => format!("[{}]", card),
            None => "[telcard]".to_string(),
        }
    }

    fn finish(&self, message: String) {
        if let Some(pb) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerProgressNotifier for ProgressReporter {
    fn on_card_selected(&self, card: Card) {
        *self.card.lock().unwrap_or_else(|e| e.into_inner()) = Some(card);
    }

    fn on_attempt_start(&self, attempt: u8) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(self.prefix());
        pb.set_message(Self::attempt_label(attempt));
        pb.enable_steady_tick(Duration::from_millis(100));

        let previous = self
            .spinner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(pb);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn on_attempt_complete(&self, attempt: u8, valid: Option<bool>) {
        let message = match valid {
            Some(true) => format!("{} reply accepted", "v".green()),
            Some(false) => format!("{} reply missing bullets, retrying", "!".yellow()),
            None => format!("{} corrected reply received (call {})", "v".green(), attempt),
        };
        self.finish(message);
    }

    fn on_attempt_failed(&self, attempt: u8, error: &str) {
        self.finish(format!("{} call {} failed: {}", "x".red(), attempt, error));
    }
}

/// Plain line-based progress (no spinner)
pub struct SimpleProgress;

impl AnswerProgressNotifier for SimpleProgress {
    fn on_card_selected(&self, card: Card) {
        eprintln!("{} card {}", "->".cyan(), card.to_string().bold());
    }

    fn on_attempt_start(&self, attempt: u8) {
        eprintln!("  {}", ProgressReporter::attempt_label(attempt));
    }

    fn on_attempt_complete(&self, _attempt: u8, valid: Option<bool>) {
        match valid {
            Some(false) => eprintln!("  {} reply missing bullets", "!".yellow()),
            _ => eprintln!("  {} done", "v".green()),
        }
    }

    fn on_attempt_failed(&self, attempt: u8, error: &str) {
        eprintln!("  {} call {} failed: {}", "x".red(), attempt, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_card_in_prefix() {
        let reporter = ProgressReporter::new();
        assert_eq!(reporter.prefix(), "[telcard]");

        reporter.on_card_selected(Card::Definition);
        assert_eq!(reporter.prefix(), "[Definition]");
    }

    #[test]
    fn test_reporter_lifecycle_clears_spinner() {
        let reporter = ProgressReporter::new();
        reporter.on_card_selected(Card::Design);
        reporter.on_attempt_start(1);
        assert!(reporter.spinner.lock().unwrap().is_some());

        reporter.on_attempt_complete(1, Some(false));
        assert!(reporter.spinner.lock().unwrap().is_none());

        reporter.on_attempt_start(2);
        reporter.on_attempt_failed(2, "timeout");
        assert!(reporter.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_attempt_labels() {
        assert_eq!(ProgressReporter::attempt_label(1), "Waiting for the model...");
        assert_eq!(
            ProgressReporter::attempt_label(2),
            "Requesting corrected answer..."
        );
    }
}
