//! Completion parameters - backend call settings.
//!
//! [`CompletionParams`] groups the static settings that
//! [`RunAnswerUseCase`](crate::use_cases::run_answer::RunAnswerUseCase)
//! uses for every backend call.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use telcard_domain::Model;

/// Sampling temperature for the first attempt
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Upper bound on a single backend call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Backend call settings shared by both attempts of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Model used for both the first and the corrective attempt.
    pub model: Model,
    /// Temperature for the first attempt.
    pub temperature: f32,
    /// Temperature for the corrective attempt; `None` omits it.
    pub corrective_temperature: Option<f32>,
    /// Timeout applied to each backend call.
    pub timeout: Duration,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
            corrective_temperature: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CompletionParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_corrective_temperature(mut self, temperature: Option<f32>) -> Self {
        self.corrective_temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
