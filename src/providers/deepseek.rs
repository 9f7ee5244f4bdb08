use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::app_config::ProviderConfig;
use crate::errors::{ConfigError, ProviderError};
use crate::translation::prompts::PromptTemplate;

use super::{Provider, TranslationRequest};

/// DeepSeek client for the OpenAI-compatible chat completions API
///
/// The inner `reqwest::Client` keeps one connection pool for the lifetime of
/// the value; dropping the `DeepSeek` closes it.
pub struct DeepSeek {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Full `/chat/completions` URL
    url: String,
    /// Model name
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Prompt used for every cell
    template: PromptTemplate,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (user, assistant, system)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion response, only the fields we read
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One generated choice
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The assistant message
    pub message: Option<ChatResponseMessage>,
}

/// Message inside a choice; content may be null for tool calls
#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    /// Generated text
    pub content: Option<String>,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl DeepSeek {
    /// Create a new client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: &str,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            url: format!("{}/chat/completions", endpoint.trim_end_matches('/')),
            model: model.into(),
            temperature,
            template: PromptTemplate::default(),
        })
    }

    /// Create a client from validated provider settings
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            config.api_key.clone(),
            &config.endpoint,
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// URL requests are sent to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a chat completion request
    pub async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepSeek API error ({}): {}", status, error_text);
            return Err(map_status_error(status, error_text));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        serde_json::from_str::<ChatResponse>(&body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, truncate(&body, 200))))
    }

    /// Extract `choices[0].message.content`
    pub fn extract_text_from_response(response: &ChatResponse) -> Option<&str> {
        response
            .choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

#[async_trait]
impl Provider for DeepSeek {
    async fn complete(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let prompt = self.template.render(&request.text, &request.target_language);
        let chat_request = ChatRequest::new(self.model.clone())
            .add_message("user", prompt)
            .temperature(self.temperature);

        let response = self.complete_chat(&chat_request).await?;
        let content = Self::extract_text_from_response(&response).ok_or_else(|| {
            ProviderError::ParseError("response has no choices[0].message.content".to_string())
        })?;

        debug!("DeepSeek returned {} chars", content.chars().count());
        Ok(content.to_string())
    }

    fn name(&self) -> &str {
        "DeepSeek"
    }
}

impl fmt::Debug for DeepSeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeek")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::ConnectionError(format!("request timed out: {}", e))
    } else if e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

fn map_status_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
