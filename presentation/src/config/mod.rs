//! Presentation-level configuration
//!
//! Resolves how output is rendered from command-line flags layered over
//! the values read from configuration files.

use crate::cli::commands::OutputFormat as CliOutputFormat;
use telcard_domain::OutputFormat;

/// Effective output settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Start from file values
    pub fn from_file(format: Option<OutputFormat>, color: bool, show_progress: bool) -> Self {
        Self {
            format: format.unwrap_or_default(),
            color,
            show_progress,
        }
    }

    /// Apply command-line overrides; `--quiet` always hides progress
    pub fn with_cli(mut self, output: Option<CliOutputFormat>, quiet: bool) -> Self {
        if let Some(format) = output {
            self.format = format.into();
        }
        if quiet {
            self.show_progress = false;
        }
        self
    }

    /// JSON output must stay machine-readable, so it never shows a spinner
    pub fn progress_enabled(&self) -> bool {
        self.show_progress && self.format != OutputFormat::Json
    }
}
