use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

/// Website region a content idea can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    Services,
    Gallery,
    Testimonials,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Hero,
        Section::Services,
        Section::Gallery,
        Section::Testimonials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::Gallery => "gallery",
            Self::Testimonials => "testimonials",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownSection(value.to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("field \"section\" is required")]
    MissingSection,
    #[error("field \"section\" must be a string")]
    SectionNotString,
    #[error("field \"section\" must be one of hero, services, gallery, testimonials (got \"{0}\")")]
    UnknownSection(String),
    #[error("field \"topic\" must be a string")]
    TopicNotString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIdeaRequest {
    section: Section,
    topic: Option<String>,
}

impl ContentIdeaRequest {
    pub fn new(section: Section, topic: Option<String>) -> Self {
        Self { section, topic }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// The topic to constrain the prompt with, if there is a non-blank one.
    pub fn topic_constraint(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
    }
}

/// Validates a raw JSON body into a [`ContentIdeaRequest`].
///
/// `topic` may be absent or `null`; any other non-string value is rejected.
/// Unknown fields are ignored.
pub fn parse_request(value: &Value) -> Result<ContentIdeaRequest, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let section = match object.get("section") {
        None | Some(Value::Null) => return Err(ValidationError::MissingSection),
        Some(Value::String(raw)) => raw.parse::<Section>()?,
        Some(_) => return Err(ValidationError::SectionNotString),
    };

    let topic = match object.get("topic") {
        None | Some(Value::Null) => None,
        Some(Value::String(topic)) => Some(topic.clone()),
        Some(_) => return Err(ValidationError::TopicNotString),
    };

    Ok(ContentIdeaRequest::new(section, topic))
}
