//! Validated payloads.
//!
//! A [`ValidatedPayload`] is only ever constructed by a loader after every
//! format, type and range check has passed. The prompt builder accepts
//! nothing else.

use image::DynamicImage;
use std::fmt;

use crate::types::ValidatorKind;

/// Lowest acceptable review score (inclusive).
pub const MIN_SCORE: f64 = 1.0;

/// Highest acceptable review score (inclusive).
pub const MAX_SCORE: f64 = 5.0;

/// A review score inside `[1, 5]`.
///
/// Keeps the literal the user sent so the prompt shows `4`, not `4.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    value: f64,
    literal: String,
}

impl Score {
    /// Build a score, returning `None` when the value falls outside `[1, 5]`.
    ///
    /// NaN and infinities are out of range.
    pub fn new(value: f64, literal: impl Into<String>) -> Option<Self> {
        if (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Some(Self {
                value,
                literal: literal.into(),
            })
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// Input that has passed loader validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedPayload {
    /// Decoded attachment images plus the user's description.
    ImageClaim {
        images: Vec<DynamicImage>,
        claim_text: String,
    },

    /// Base64 image body (data-URI prefix already stripped) plus review text.
    InlineImageClaim {
        image_base64: String,
        review_text: String,
    },

    /// Non-empty review text plus a score in `[1, 5]`.
    ReviewScoreClaim { review_text: String, score: Score },
}

impl ValidatedPayload {
    /// Which validator produces this variant.
    pub fn kind(&self) -> ValidatorKind {
        match self {
            ValidatedPayload::ImageClaim { .. } => ValidatorKind::ImageDescription,
            ValidatedPayload::InlineImageClaim { .. } => ValidatorKind::InlineImageReview,
            ValidatedPayload::ReviewScoreClaim { .. } => ValidatorKind::ReviewScore,
        }
    }

    /// The claim text that ends every rendered turn.
    pub fn claim_text(&self) -> &str {
        match self {
            ValidatedPayload::ImageClaim { claim_text, .. } => claim_text,
            ValidatedPayload::InlineImageClaim { review_text, .. } => review_text,
            ValidatedPayload::ReviewScoreClaim { review_text, .. } => review_text,
        }
    }
}
