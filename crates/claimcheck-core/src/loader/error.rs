//! Loader error taxonomy.

use std::fmt;

use thiserror::Error;

/// How a failure should be reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Bad JSON, missing or mistyped fields, out-of-range score, undecodable image
    MalformedInput,

    /// Recognized but empty input (no images, no content); softer wording
    SoftSkip,

    /// The completion call failed
    DownstreamFault,
}

/// A reply explaining why a message produced no verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub text: String,
}

impl Diagnostic {
    /// Malformed input found after loading, e.g. while rendering the prompt.
    pub fn malformed(error: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::MalformedInput,
            text: format!("⚠️ {}", error),
        }
    }

    /// The completion call failed.
    pub fn downstream_fault(error: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::DownstreamFault,
            text: format!("🔧 Error processing request: {}", error),
        }
    }
}

impl From<&LoadError> for Diagnostic {
    fn from(error: &LoadError) -> Self {
        Self {
            kind: error.kind(),
            text: error.diagnostic(),
        }
    }
}

/// Why a message did not produce a payload.
///
/// The `Display` text is the user-facing explanation; [`LoadError::diagnostic`]
/// adds the category glyph used in replies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Please attach an image to validate")]
    NoImages,

    #[error("{request}")]
    MissingContent { request: &'static str },

    #[error("Invalid JSON format. Expected: {expected}")]
    InvalidJson { expected: &'static str },

    #[error("Input must be a JSON object")]
    NotAnObject,

    #[error("JSON must contain 'review' and 'score' fields")]
    MissingReviewOrScore,

    #[error("Review must be a non-empty string")]
    InvalidReview,

    #[error("Review must be a string")]
    ReviewNotString,

    #[error("Score must be a number between 1 and 5")]
    ScoreNotNumeric,

    #[error("Score must be between 1 and 5 (got {literal})")]
    ScoreOutOfRange { literal: String },

    #[error("JSON must contain an 'image' field")]
    MissingImage,

    #[error("Image must be a base64 string")]
    ImageNotString,

    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },
}

impl LoadError {
    /// Category of this failure.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            LoadError::NoImages | LoadError::MissingContent { .. } => DiagnosticKind::SoftSkip,
            _ => DiagnosticKind::MalformedInput,
        }
    }

    /// The reply text for this failure.
    pub fn diagnostic(&self) -> String {
        let glyph = match self {
            LoadError::NoImages => "🖼️",
            LoadError::MissingContent { .. } => "📝",
            _ => "⚠️",
        };
        format!("{} {}", glyph, self)
    }

    /// True for score type and range failures.
    pub fn is_score_error(&self) -> bool {
        matches!(
            self,
            LoadError::ScoreNotNumeric | LoadError::ScoreOutOfRange { .. }
        )
    }
}
