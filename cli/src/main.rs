//! CLI entrypoint for telcard
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use telcard_application::{
    ConversationLogger, NoAnswerProgress, NoConversationLogger, RunAnswerInput, RunAnswerUseCase,
};
use telcard_domain::{Model, PromptAssembler};
use telcard_infrastructure::{
    ChatCompletionsGateway, ConfigLoader, FileConfig, JsonlConversationLogger, PreambleLoader,
};
use telcard_presentation::{ChatRepl, Cli, ConsoleFormatter, OutputConfig, ProgressReporter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status for a request interrupted with Ctrl-C
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref());
    info!("Starting telcard");

    let output = OutputConfig::from_file(
        config.output.format,
        config.output.color,
        config.repl.show_progress,
    )
    .with_cli(cli.output, cli.quiet);
    if !output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let preamble = PreambleLoader::load(config.prompt.preamble_path.as_deref())?;
    let gateway = Arc::new(ChatCompletionsGateway::from_config(&config.backend)?);
    info!(
        endpoint = %config.backend.endpoint,
        azure = gateway.is_azure(),
        model = %config.completion.model,
        "Backend configured"
    );

    let use_case = RunAnswerUseCase::new(gateway, PromptAssembler::new(preamble.text))
        .with_params(config.completion_params())
        .with_conversation_logger(conversation_logger(config.logging.conversation_log.as_deref()));

    // Chat mode
    if cli.chat {
        let history_file = config
            .repl
            .history_file
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join("telcard").join("history.txt")));

        let mut repl = ChatRepl::new(use_case)
            .with_progress(output.progress_enabled())
            .with_output(output.format)
            .with_history_file(history_file);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let Some(question) = cli.question else {
        bail!("Question is required. Use --chat for interactive mode.");
    };

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });
    let use_case = use_case.with_cancellation(token);

    let input = RunAnswerInput::new(question.clone());
    let result = if output.progress_enabled() {
        let progress = ProgressReporter::new();
        use_case.execute(input, &progress).await
    } else {
        use_case.execute(input, &NoAnswerProgress).await
    };

    match result {
        Ok(outcome) => {
            println!(
                "{}",
                ConsoleFormatter::format(&outcome, &question, output.format)
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("Cancelled.");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e.to_string()));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Command-line flags take precedence over every config source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.completion.model = Model::from(model.as_str());
    }
    if let Some(temperature) = cli.temperature {
        config.completion.temperature = temperature;
    }
    if let Some(timeout) = cli.timeout {
        config.completion.timeout_seconds = timeout;
    }
}

/// Install the stderr subscriber, plus a daily-rotated file log when
/// `log_dir` is set.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "telcard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn conversation_logger(path: Option<&Path>) -> Arc<dyn ConversationLogger> {
    let Some(path) = path else {
        return Arc::new(NoConversationLogger);
    };

    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!(
                "Could not open conversation log {}: {}; continuing without it",
                path.display(),
                e
            );
            Arc::new(NoConversationLogger)
        }
    }
}
