//! OpenAI-compatible chat completions backend.
//!
//! Sends one system message and one user message per prompt and returns the
//! first choice's content, trimmed. Defaults target DeepSeek.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{BackendError, BackendResult, Summarizer};

/// `[backend.chat]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// API root; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    /// Replaces the language's built-in system message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Backend for OpenAI-compatible chat APIs.
pub struct ChatBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    system_prompt: String,
    timeout: Duration,
}

impl ChatBackend {
    /// Create a backend reading the API key from `config.api_key_env`.
    pub fn new(
        config: &ChatConfig,
        timeout: Duration,
        default_system_prompt: &str,
    ) -> BackendResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BackendError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_api_key(config, api_key, timeout, default_system_prompt)
    }

    /// Create a backend with an explicit API key.
    pub fn with_api_key(
        config: &ChatConfig,
        api_key: impl Into<String>,
        timeout: Duration,
        default_system_prompt: &str,
    ) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: api_key.into(),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| default_system_prompt.to_string()),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Http(err)
        }
    }
}

impl Summarizer for ChatBackend {
    fn name(&self) -> &str {
        "Chat"
    }

    fn summarize(&self, prompt: &str) -> BackendResult<String> {
        tracing::info!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "requesting summary"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.map_transport_error(e))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited(body));
        }
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_reply(&body)
    }
}

/// Pull the first choice's content out of a chat completions response body.
fn extract_reply(body: &str) -> BackendResult<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::InvalidResponse("response contained no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    let reply = content.trim();
    if reply.is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(reply.to_string())
}
