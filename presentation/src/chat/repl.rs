//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use telcard_application::{NoAnswerProgress, RunAnswerInput, RunAnswerUseCase};
use telcard_domain::OutputFormat;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Line-editor history entries kept on disk
const HISTORY_CAPACITY: usize = 500;

/// A slash command typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    /// Show which card a question routes to
    Card(String),
    History,
    Clear,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    /// Parse a line starting with `/`; returns `None` for ordinary questions.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        Some(match name {
            "/help" | "/h" | "/?" => Self::Help,
            "/card" => Self::Card(rest.to_string()),
            "/history" => Self::History,
            "/clear" => Self::Clear,
            "/quit" | "/exit" | "/q" => Self::Quit,
            _ => Self::Unknown(name.to_string()),
        })
    }
}

/// Conversation turns kept for the lifetime of a chat session.
///
/// Entries alternate user question and assistant answer. A turn is only
/// recorded once the answer succeeded, so the list always has even length.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    turns: Vec<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(question.into());
        self.turns.push(answer.into());
    }

    pub fn history(&self) -> &[String] {
        &self.turns
    }

    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: RunAnswerUseCase,
    show_progress: bool,
    output: OutputFormat,
    history_file: Option<PathBuf>,
    session: ChatSession,
}

impl ChatRepl {
    pub fn new(use_case: RunAnswerUseCase) -> Self {
        Self {
            use_case,
            show_progress: true,
            output: OutputFormat::Answer,
            history_file: None,
            session: ChatSession::new(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Persist line-editor input history to `path`
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("telcard".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ChatCommand::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.history_file.clone() else {
            return editor;
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open history file {}: {}", path.display(), e);
                editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│             telcard - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.use_case.params().model);
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /card <question>  - Show which card a question routes to");
        println!("  /history          - Show the conversation so far");
        println!("  /clear            - Forget the conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ChatCommand) -> bool {
        match command {
            ChatCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ChatCommand::Help => Self::print_help(),
            ChatCommand::Card(text) if text.is_empty() => {
                println!("Usage: /card <question>");
            }
            ChatCommand::Card(text) => {
                let card = self.use_case.selector().select(&text);
                println!("{} {}", "Card:".cyan().bold(), card.to_string().yellow());
            }
            ChatCommand::History => self.print_history(),
            ChatCommand::Clear => {
                self.session.clear();
                println!("Conversation cleared.");
            }
            ChatCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn print_history(&self) {
        if self.session.exchanges() == 0 {
            println!("No conversation yet.");
            return;
        }

        for (i, pair) in self.session.history().chunks(2).enumerate() {
            println!("{} {}", format!("[{}] Q:", i + 1).cyan().bold(), pair[0]);
            if let Some(answer) = pair.get(1) {
                println!("{}", ConsoleFormatter::indent(answer, "    "));
            }
        }
        println!();
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        // Each turn gets its own token so one Ctrl-C does not poison later turns.
        let token = CancellationToken::new();
        let use_case = self.use_case.clone().with_cancellation(token.clone());
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        let input =
            RunAnswerInput::new(question).with_history(self.session.history().to_vec());
        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            use_case.execute(input, &progress).await
        } else {
            use_case.execute(input, &NoAnswerProgress).await
        };
        ctrl_c.abort();

        match result {
            Ok(outcome) => {
                println!(
                    "{}",
                    ConsoleFormatter::format(&outcome, question, self.output)
                );
                self.session.record(question, outcome.into_answer());
            }
            Err(e) if e.is_cancelled() => println!("{}", "Cancelled.".yellow()),
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
        println!();
    }
}
