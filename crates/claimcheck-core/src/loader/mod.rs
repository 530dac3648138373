//! Input loaders.
//!
//! Each loader turns one [`InboundMessage`](crate::InboundMessage) into a
//! [`ValidatedPayload`](crate::ValidatedPayload) or a [`LoadError`]. Loaders
//! never panic and never emit replies themselves; the caller turns the error's
//! [`diagnostic`](LoadError::diagnostic) into exactly one reply.
//!
//! The attachment loader is split in two because byte resolution belongs to
//! the transport: the caller resolves attachments one at a time and feeds
//! the bytes to an [`ImageClaimLoader`].

mod attachment_image;
mod error;
mod inline_image;
mod review_score;

pub use attachment_image::{decode_image, load_image_claim, ImageClaimLoader, ResolvedAttachment};
pub use error::{Diagnostic, DiagnosticKind, LoadError};
pub use inline_image::{load_inline_image, strip_data_uri_prefix};
pub use review_score::load_review_score;

/// Expected body for the inline image validator, quoted in diagnostics.
pub const INLINE_IMAGE_SHAPE: &str = r#"{"image": "<base64>", "review": "<text>"}"#;

/// Expected body for the review-score validator, quoted in diagnostics.
pub const REVIEW_SCORE_SHAPE: &str = r#"{"review": "<text>", "score": <1-5>}"#;
