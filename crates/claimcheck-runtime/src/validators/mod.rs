//! The three claim validators.
//!
//! Each is a small strategy plugged into the shared
//! [`ValidationPipeline`](crate::ValidationPipeline): it picks the system
//! prompt and the loader, and nothing else.

mod body;
mod image_description;
mod traits;

use std::sync::Arc;

use claimcheck_core::ValidatorKind;

pub use body::{InlineImageReviewValidator, ReviewScoreValidator};
pub use image_description::ImageDescriptionValidator;
pub use traits::ClaimValidator;

/// The validator for `kind`.
pub fn for_kind(kind: ValidatorKind) -> Arc<dyn ClaimValidator> {
    match kind {
        ValidatorKind::ImageDescription => Arc::new(ImageDescriptionValidator),
        ValidatorKind::InlineImageReview => Arc::new(InlineImageReviewValidator),
        ValidatorKind::ReviewScore => Arc::new(ReviewScoreValidator),
    }
}
