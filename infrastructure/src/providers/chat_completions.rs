//! Chat-completions HTTP backend.
//!
//! Speaks the OpenAI `chat/completions` wire format. When an API version
//! is configured the Azure OpenAI deployment URL and `api-key` header are
//! used instead of the OpenAI path and bearer token.

use crate::config::FileBackendConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use telcard_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use telcard_domain::{Message, Model};
use telcard_domain::core::string::truncate;
use thiserror::Error;
use tracing::{debug, warn};

/// Longest slice of an error body carried into a [`GatewayError`]
const MAX_ERROR_BODY: usize = 300;

/// Errors raised while constructing the backend client
#[derive(Error, Debug)]
pub enum BackendSetupError {
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`LlmGateway`] backed by an OpenAI-compatible HTTP endpoint.
pub struct ChatCompletionsGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: Option<String>,
}

impl ChatCompletionsGateway {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: Option<String>,
    ) -> Result<Self, BackendSetupError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            endpoint,
            api_key: api_key.into(),
            api_version,
        })
    }

    /// Build the gateway from the `[backend]` section, reading the key
    /// from the configured environment variable.
    pub fn from_config(config: &FileBackendConfig) -> Result<Self, BackendSetupError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BackendSetupError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(&config.endpoint, api_key, config.api_version.clone())
    }

    pub fn is_azure(&self) -> bool {
        self.api_version.is_some()
    }

    fn url(&self, model: &Model) -> String {
        match &self.api_version {
            Some(version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint,
                model.as_str(),
                version
            ),
            None => format!("{}/chat/completions", self.endpoint),
        }
    }

    fn request_body(request: &CompletionRequest) -> ChatRequest<'_> {
        ChatRequest {
            model: request.model.as_str(),
            messages: &request.messages,
            temperature: request.temperature,
        }
    }

    fn parse_reply(body: &str) -> Result<String, GatewayError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| GatewayError::InvalidResponse(format!("Malformed body: {e}")))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::InvalidResponse("Reply has no message content".into()))
    }

    fn status_error(status: StatusCode, body: &str) -> GatewayError {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| truncate(body, MAX_ERROR_BODY));

        if status == StatusCode::TOO_MANY_REQUESTS {
            GatewayError::RateLimited(detail)
        } else {
            GatewayError::RequestFailed(format!("HTTP {status}: {detail}"))
        }
    }
}

#[async_trait]
impl LlmGateway for ChatCompletionsGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let url = self.url(&request.model);
        debug!(
            url = %url,
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion"
        );

        let builder = self
            .client
            .post(&url)
            .timeout(request.timeout)
            .json(&Self::request_body(request));
        let builder = if self.is_azure() {
            builder.header("api-key", &self.api_key)
        } else {
            builder.bearer_auth(&self.api_key)
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(format!("Failed to read response: {e}"))
            }
        })?;

        if !status.is_success() {
            warn!(status = %status, "Chat completion rejected");
            return Err(Self::status_error(status, &body));
        }

        Self::parse_reply(&body)
    }
}
