//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Card, backend call count and the answer
    Full,
    /// Only the answer text
    Answer,
    /// JSON output
    Json,
}

impl From<OutputFormat> for telcard_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Answer => Self::Answer,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for telcard
#[derive(Parser, Debug)]
#[command(name = "telcard")]
#[command(author, version, about = "Telecom Q&A with card-shaped, five-bullet answers")]
#[command(long_about = r#"
telcard answers telecom engineering questions with a fixed five-bullet layout.

Each question is routed to a card by keyword:
  Definition       "what is", "define", "explain"
  Troubleshooting  "error", "alarm", "fail", "downtime", "outage", "degrade"
  Design           everything else

If the first reply does not contain five bullets, one corrective request
is sent and its reply is returned as-is.

Configuration files are loaded from (in priority order):
1. TELCARD_* environment variables (e.g. TELCARD_COMPLETION__MODEL)
2. --config <path>     Explicit config file
3. ./telcard.toml      Project-level config
4. ~/.config/telcard/config.toml   Global config

Example:
  telcard "What is a gNB?"
  telcard -o full "S1 setup failure after eNB restart"
  telcard --chat -m telcogpt
"#)]
pub struct Cli {
    /// The question to answer (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Model (deployment name on Azure) to query
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature for the first attempt
    #[arg(long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Timeout in seconds for each backend call
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format (defaults to the config file, then "answer")
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
