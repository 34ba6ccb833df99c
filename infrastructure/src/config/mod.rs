//! Configuration file loading for telcard
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TELCARD_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./telcard.toml` or `./.telcard.toml`
//! 4. Global: `$XDG_CONFIG_HOME/telcard/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, FileBackendConfig,
    FileCompletionConfig, FileConfig, FileLoggingConfig, FileOutputConfig, FileOutputFormat,
    FilePromptConfig, FileReplConfig,
};
pub use loader::ConfigLoader;
