//! AI-assisted content ideas for the studio website.
//!
//! A [`ContentIdeaRequest`] is validated, rendered into one fixed prompt and
//! sent to a [`CompletionModel`] together with the JSON Schema of
//! [`ContentIdeaResponse`]. The answer is validated before it is returned.
//! One request means one model call. There is no streaming or retry.

mod prompt;
mod request;
mod response;

use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::bridge::{BridgeError, CompletionModel, CompletionRequest};
use crate::notify::{Notification, NotificationSink, Severity};

pub use prompt::{render_prompt, TOPIC_CLAUSE_PREFIX};
pub use request::{parse_request, ContentIdeaRequest, Section, ValidationError};
pub use response::{
    parse_response, response_schema, ContentIdeaResponse, SchemaViolation, REQUESTED_IDEAS,
    SCHEMA_NAME,
};

const FALLBACK_ERROR: &str = "content idea generation failed";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid content idea request: {0}")]
    Validation(#[from] ValidationError),
    #[error("content idea generation failed: {0}")]
    Upstream(#[from] BridgeError),
    #[error("content idea generation failed: {0}")]
    Schema(#[from] SchemaViolation),
}

pub struct ContentIdeaGenerator {
    model: Arc<dyn CompletionModel>,
}

impl ContentIdeaGenerator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub async fn generate(
        &self,
        request: &ContentIdeaRequest,
    ) -> Result<ContentIdeaResponse, GenerateError> {
        tracing::info!(
            section = %request.section(),
            has_topic = request.topic_constraint().is_some(),
            "generating content ideas"
        );

        let completion = CompletionRequest {
            prompt: render_prompt(request),
            schema_name: SCHEMA_NAME.to_string(),
            schema: response_schema(),
        };
        let raw = self.model.complete(&completion).await?;
        let response = parse_response(&raw)?;

        if response.ideas.len() != REQUESTED_IDEAS {
            tracing::warn!(
                requested = REQUESTED_IDEAS,
                returned = response.ideas.len(),
                "model returned an unexpected number of ideas"
            );
        }
        tracing::info!(count = response.ideas.len(), "content ideas generated");

        Ok(response)
    }

    /// Validates a raw JSON body and generates ideas for it. Validation runs
    /// before the model is contacted.
    pub async fn generate_from_json(
        &self,
        payload: &Value,
    ) -> Result<ContentIdeaResponse, GenerateError> {
        let request = parse_request(payload)?;
        self.generate(&request).await
    }
}

/// Result handed back to UI code: `{success: true, data}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaResult {
    Success(Vec<String>),
    Failure(String),
}

impl IdeaResult {
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Failure(FALLBACK_ERROR.to_string())
        } else {
            Self::Failure(message)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<ContentIdeaResponse, GenerateError>> for IdeaResult {
    fn from(result: Result<ContentIdeaResponse, GenerateError>) -> Self {
        match result {
            Ok(response) => Self::Success(response.ideas),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

impl Serialize for IdeaResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IdeaResult", 2)?;
        match self {
            Self::Success(ideas) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", ideas)?;
            }
            Self::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

/// Caller-facing entry point. Never fails: every error comes back as
/// [`IdeaResult::Failure`] and is also reported to `sink`.
pub async fn generate_content_ideas(
    generator: &ContentIdeaGenerator,
    payload: &Value,
    sink: &dyn NotificationSink,
) -> IdeaResult {
    let outcome = generator.generate_from_json(payload).await;
    report(outcome, sink)
}

pub(crate) fn report(
    outcome: Result<ContentIdeaResponse, GenerateError>,
    sink: &dyn NotificationSink,
) -> IdeaResult {
    let result = IdeaResult::from(outcome);
    match &result {
        IdeaResult::Success(ideas) => sink.notify(Notification::new(
            Severity::Success,
            format!("Generated {} content ideas", ideas.len()),
        )),
        IdeaResult::Failure(error) => sink.notify(Notification::new(Severity::Error, error.clone())),
    }
    result
}
