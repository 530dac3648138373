//! Prompt construction.
//!
//! Renders a [`ValidatedPayload`](crate::ValidatedPayload) into a user turn
//! that any chat-completion provider can consume. Output is a pure function of
//! the payload and the fixed templates: no randomness, no clock, no I/O.

mod builder;
mod content;
mod imaging;

pub use builder::{render_review_score, render_user_turn, REVIEW_SCORE_QUESTION};
pub use content::{build_data_uri, parse_data_uri, ChatMessage, ContentBlock, ImageUrl, MessageContent};
pub use imaging::{normalize_image, thumbnail_dimensions, JPEG_QUALITY, MAX_DIMENSION};

use thiserror::Error;

/// Errors from prompt construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PromptError {
    #[error("Failed to encode image: {0}")]
    ImageEncoding(String),
}
