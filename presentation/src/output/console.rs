//! Console output formatter for answers

use colored::Colorize;
use telcard_application::AnswerOutcome;
use telcard_domain::OutputFormat;

/// Formats answer outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `outcome` in the requested format
    pub fn format(outcome: &AnswerOutcome, question: &str, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_full(outcome, question),
            OutputFormat::Answer => Self::format_answer(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Card, call count and the answer under a header
    pub fn format_full(outcome: &AnswerOutcome, question: &str) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("telcard"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));
        output.push_str(&format!(
            "{} {}\n",
            "Card:".cyan().bold(),
            outcome.card.to_string().yellow().bold()
        ));

        let calls = if outcome.was_corrected() {
            format!("{} (first reply rejected, corrected)", outcome.attempts)
        } else {
            outcome.attempts.to_string()
        };
        output.push_str(&format!("{} {}\n", "Backend calls:".cyan().bold(), calls));

        output.push_str(&Self::section_header("Answer"));
        output.push('\n');
        output.push_str(outcome.answer());
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// The answer text only
    pub fn format_answer(outcome: &AnswerOutcome) -> String {
        outcome.answer().to_string()
    }

    /// Format as JSON
    pub fn format_json(outcome: &AnswerOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// One-line error message for the terminal
    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
