//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout and are deserialized
//! directly. Conversion into application types happens in
//! [`FileConfig::completion_params`].
//!
//! ```toml
//! [backend]
//! endpoint = "https://my-resource.openai.azure.com"
//! api_key_env = "AZURE_OPENAI_API_KEY"
//! api_version = "2024-12-01-preview"
//!
//! [completion]
//! model = "telcogpt"
//! temperature = 0.2
//! timeout_seconds = 20
//!
//! [prompt]
//! preamble_path = "prompts/static_prompt.txt"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use telcard_application::CompletionParams;
use telcard_application::config::{DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use telcard_domain::{Model, OutputFormat};
use thiserror::Error;

// Re-export OutputFormat from domain for convenience
pub use telcard_domain::OutputFormat as FileOutputFormat;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("temperature {0} is outside 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("backend endpoint cannot be empty")]
    EmptyEndpoint,
}

/// Raw backend configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the chat-completions service
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Azure OpenAI API version; switches to the Azure URL and header scheme
    pub api_version: Option<String>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_version: None,
        }
    }
}

/// Raw completion configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCompletionConfig {
    pub model: Model,
    /// Temperature for the first attempt
    pub temperature: f32,
    /// Temperature for the corrective attempt (omitted when unset)
    pub corrective_temperature: Option<f32>,
    /// Timeout in seconds for each backend call
    pub timeout_seconds: u64,
}

impl Default for FileCompletionConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
            corrective_temperature: None,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Raw prompt configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptConfig {
    /// System preamble file; the built-in preamble is used when unset and
    /// the default file is absent
    pub preamble_path: Option<PathBuf>,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to the line-editor history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rotated diagnostic log files
    pub dir: Option<PathBuf>,
    /// JSONL conversation transcript path
    pub conversation_log: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: FileBackendConfig,
    pub completion: FileCompletionConfig,
    pub prompt: FilePromptConfig,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.completion.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.completion.model.as_str().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        let temperatures = std::iter::once(self.completion.temperature)
            .chain(self.completion.corrective_temperature);
        for t in temperatures {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigValidationError::InvalidTemperature(t));
            }
        }
        if self.backend.endpoint.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEndpoint);
        }
        Ok(())
    }

    /// Backend call settings for the answer use case
    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams::default()
            .with_model(self.completion.model.clone())
            .with_temperature(self.completion.temperature)
            .with_corrective_temperature(self.completion.corrective_temperature)
            .with_timeout(Duration::from_secs(self.completion.timeout_seconds))
    }
}
