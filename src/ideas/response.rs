use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Number of ideas the prompt asks for. Advisory only.
pub const REQUESTED_IDEAS: usize = 3;

pub const SCHEMA_NAME: &str = "content_ideas";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdeaResponse {
    pub ideas: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("model returned an empty response")]
    Empty,
    #[error("model response is not valid JSON: {0}")]
    NotJson(String),
    #[error("model response must be a JSON object")]
    NotAnObject,
    #[error("model response is missing the \"ideas\" field")]
    MissingIdeas,
    #[error("\"ideas\" must be an array of strings")]
    IdeasNotStrings,
    #[error("model returned no ideas")]
    NoIdeas,
}

/// JSON Schema sent to the model alongside the prompt.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ideas": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["ideas"],
        "additionalProperties": false
    })
}

/// Validates raw model output into a [`ContentIdeaResponse`].
///
/// Ideas are returned exactly as the model wrote them.
pub fn parse_response(raw: &str) -> Result<ContentIdeaResponse, SchemaViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SchemaViolation::Empty);
    }

    let value: Value = serde_json::from_str(strip_code_fence(trimmed))
        .map_err(|e| SchemaViolation::NotJson(e.to_string()))?;
    let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

    let ideas = match object.get("ideas") {
        None | Some(Value::Null) => return Err(SchemaViolation::MissingIdeas),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or(SchemaViolation::IdeasNotStrings)?,
        Some(_) => return Err(SchemaViolation::IdeasNotStrings),
    };

    if ideas.is_empty() {
        return Err(SchemaViolation::NoIdeas);
    }

    Ok(ContentIdeaResponse { ideas })
}

fn strip_code_fence(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
