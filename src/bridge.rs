use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tokio::time::{timeout, Duration};

/// One structured completion: a rendered prompt plus the JSON Schema the
/// answer must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub schema_name: String,
    pub schema: Value,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("model integration missing: set MODEL_API_KEY")]
    MissingApiKey,
    #[error("model request timed out after {0} ms")]
    Timeout(u64),
    #[error("failed to send model request: {0}")]
    Transport(#[source] reqwest::Error),
    /// `body` is kept for logs and is not part of the message.
    #[error("model request failed ({status})")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode model response: {0}")]
    Decode(String),
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

/// Hosted text-generation model. Returns the raw completion text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BridgeError>;
}

#[derive(Clone)]
pub struct ModelConfig {
    base_url: String,
    api_key: String,
    model: String,
    timeout_ms: u64,
}

impl ModelConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_ms,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint that
/// supports `response_format: json_schema`.
pub struct OpenAiCompatibleModel {
    config: ModelConfig,
    client: reqwest::Client,
}

impl OpenAiCompatibleModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn exchange(&self, request: &CompletionRequest) -> Result<String, BridgeError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &request.schema_name,
                    schema: &request.schema,
                    strict: true,
                },
            },
            temperature: 0.8,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(BridgeError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            tracing::warn!(%status, %body, "model request rejected");
            return Err(BridgeError::Status { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(BridgeError::EmptyCompletion)
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompatibleModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BridgeError> {
        if self.config.api_key.trim().is_empty() {
            return Err(BridgeError::MissingApiKey);
        }

        timeout(
            Duration::from_millis(self.config.timeout_ms),
            self.exchange(request),
        )
        .await
        .map_err(|_| BridgeError::Timeout(self.config.timeout_ms))?
    }
}
