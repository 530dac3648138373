//! # claimcheck-core
//!
//! Deterministic input validation and prompt construction for claim validators.
//!
//! A claim validator receives a user-submitted claim (a free-text description
//! of attached images, an inline base64 image with a review, or a review with a
//! numeric score) and asks a hosted model whether the claim is internally
//! consistent. This crate owns the part of that flow that never talks to the
//! network:
//!
//! 1. **Input loading**: turn an untrusted [`InboundMessage`] into a
//!    [`ValidatedPayload`] or a typed [`LoadError`] carrying the user-facing
//!    diagnostic.
//! 2. **Prompt building**: render a payload into a [`ChatMessage`] user turn,
//!    normalizing images to bounded JPEG data URIs.
//! 3. **Verdict inspection**: defensively parse a model's reply for callers
//!    that want structure. The reply itself is always relayed verbatim.
//!
//! ## Key Guarantees
//!
//! 1. **No LLM calls**: everything here is a pure function of its input
//! 2. **Validated before rendered**: a payload only exists once every
//!    format, type and range check has passed
//! 3. **Deterministic**: the same payload always renders the same prompt
//!
//! ## Example
//!
//! ```rust,ignore
//! use claimcheck_core::{loader, prompt, InboundMessage};
//!
//! let message = InboundMessage::user(r#"{"review": "Great!", "score": 5}"#);
//! match loader::load_review_score(&message) {
//!     Ok(payload) => {
//!         let turn = prompt::render_user_turn(&payload)?;
//!         // hand `turn` to a completion provider
//!     }
//!     Err(err) => println!("{}", err.diagnostic()),
//! }
//! ```

pub mod loader;
pub mod payload;
pub mod prompt;
pub mod types;
pub mod verdict;

// Re-export main types at crate root
pub use loader::{Diagnostic, DiagnosticKind, LoadError};
pub use payload::{Score, ValidatedPayload};
pub use prompt::{ChatMessage, ContentBlock, ImageUrl, MessageContent, PromptError};
pub use types::{AttachmentRef, InboundMessage, Role, ValidatorKind};
pub use verdict::{Assessment, Verdict, VerdictError};

/// Default claim text when an image message carries no description.
pub const DEFAULT_IMAGE_QUESTION: &str = "Is this description accurate?";

/// Default review text when an inline image body omits `review`.
pub const DEFAULT_INLINE_REVIEW_QUESTION: &str = "Does this review accurately describe the image?";
