//! Payload → user turn rendering.

use super::{normalize_image, ChatMessage, ContentBlock, PromptError};
use crate::payload::{Score, ValidatedPayload};

/// Closing question of the review-score template.
pub const REVIEW_SCORE_QUESTION: &str = "Does this score make sense for this review?";

/// Render a validated payload as one user turn.
///
/// - Image claims: one normalized JPEG block per image, then the claim text.
/// - Inline image claims: the base64 body wrapped as-is, then the review text.
///   This path does not re-encode or bound the image.
/// - Review-score claims: a single plain-text turn.
pub fn render_user_turn(payload: &ValidatedPayload) -> Result<ChatMessage, PromptError> {
    match payload {
        ValidatedPayload::ImageClaim { images, claim_text } => {
            let mut blocks = Vec::with_capacity(images.len() + 1);
            for img in images {
                blocks.push(ContentBlock::image_url(normalize_image(img)?));
            }
            blocks.push(ContentBlock::text(claim_text.clone()));
            Ok(ChatMessage::user_blocks(blocks))
        }
        ValidatedPayload::InlineImageClaim {
            image_base64,
            review_text,
        } => Ok(ChatMessage::user_blocks(vec![
            ContentBlock::jpeg_base64(image_base64),
            ContentBlock::text(review_text.clone()),
        ])),
        ValidatedPayload::ReviewScoreClaim { review_text, score } => {
            Ok(ChatMessage::user(render_review_score(review_text, score)))
        }
    }
}

/// The review-score template.
pub fn render_review_score(review_text: &str, score: &Score) -> String {
    format!(
        "Review: \"{}\"\nScore: {}/5\n{}",
        review_text, score, REVIEW_SCORE_QUESTION
    )
}
