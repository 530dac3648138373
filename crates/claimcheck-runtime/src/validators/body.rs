//! Validators whose whole input is the message body.

use async_trait::async_trait;
use claimcheck_core::loader::{load_inline_image, load_review_score};
use claimcheck_core::{InboundMessage, LoadError, ValidatedPayload, ValidatorKind};

use super::ClaimValidator;
use crate::transport::Transport;

/// `{"image": "<base64>", "review": "<text>"}` in the body.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineImageReviewValidator;

#[async_trait]
impl ClaimValidator for InlineImageReviewValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::InlineImageReview
    }

    async fn load(
        &self,
        message: &InboundMessage,
        _transport: &dyn Transport,
    ) -> Result<ValidatedPayload, LoadError> {
        load_inline_image(message)
    }
}

/// `{"review": "<text>", "score": <1-5>}` in the body.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReviewScoreValidator;

#[async_trait]
impl ClaimValidator for ReviewScoreValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::ReviewScore
    }

    async fn load(
        &self,
        message: &InboundMessage,
        _transport: &dyn Transport,
    ) -> Result<ValidatedPayload, LoadError> {
        load_review_score(message)
    }
}
