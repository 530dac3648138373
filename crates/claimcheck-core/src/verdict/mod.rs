//! Model verdicts.
//!
//! A [`Verdict`] is the model's raw reply. It is relayed to the requester
//! exactly as received; nothing here may alter it. Models are asked for
//! `{"accurate": boolean, "explanation": "string"}` but are not bound by it,
//! so consumers that want structure call [`Verdict::inspect`], which parses
//! defensively and reports what went wrong instead of guessing.

mod schema;

pub use schema::validate_verdict_schema;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    /// A Markdown code fence wrapping a JSON object.
    static ref FENCED_JSON: Regex =
        Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*\})\s*```").unwrap();
}

/// Errors from verdict inspection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerdictError {
    #[error("Reply contains no JSON object")]
    NoJsonObject,

    #[error("Reply JSON is malformed: {0}")]
    Malformed(String),

    #[error("Reply does not match the verdict shape: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),
}

/// The structured judgment a well-behaved model returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub accurate: bool,
    pub explanation: String,
}

/// A model reply, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdict(String);

impl Verdict {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The reply exactly as the model produced it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Parse the reply into an [`Assessment`] without trusting its shape.
    ///
    /// Accepts a bare object, an object inside a code fence, or an object
    /// surrounded by prose (outermost braces win).
    pub fn inspect(&self) -> Result<Assessment, VerdictError> {
        let candidate = extract_json_object(&self.0).ok_or(VerdictError::NoJsonObject)?;

        let value: serde_json::Value =
            serde_json::from_str(candidate).map_err(|e| VerdictError::Malformed(e.to_string()))?;

        validate_verdict_schema(&value).map_err(VerdictError::SchemaViolation)?;

        serde_json::from_value(value).map_err(|e| VerdictError::Malformed(e.to_string()))
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

fn extract_json_object(raw: &str) -> Option<&str> {
    if let Some(caps) = FENCED_JSON.captures(raw) {
        return caps.get(1).map(|m| m.as_str());
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}
