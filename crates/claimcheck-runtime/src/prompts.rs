//! System prompts for the claim validators.
//!
//! Each validator sends exactly one system turn at the head of the history.
//! All three ask for the same reply shape,
//! `{"accurate": boolean, "explanation": "string"}`, which is what
//! [`Verdict::inspect`](claimcheck_core::Verdict::inspect) checks against.

use claimcheck_core::ValidatorKind;

/// Attachment images plus a free-text description.
pub const IMAGE_DESCRIPTION_PROMPT: &str = r#"You're an image description validator. Analyze the image and user's description.
Your response MUST be valid JSON in this format: {"accurate": boolean, "explanation": "string"}

If the description is accurate, respond with: {"accurate": true, "explanation": "brief confirmation"}
If the description is inaccurate, respond with: {"accurate": false, "explanation": "concise explanation"}

Keep explanations under 100 words. Prioritize objective visual elements.
IMPORTANT: Only return the JSON object, no additional text before or after."#;

/// One inline base64 image plus a review of it.
pub const INLINE_IMAGE_REVIEW_PROMPT: &str = r#"You're an image review validator. Analyze the image and the user's review of it.
Your response MUST be valid JSON in this format: {"accurate": boolean, "explanation": "string"}

If the review accurately describes what the image shows, respond with: {"accurate": true, "explanation": "brief confirmation"}
If the review contradicts or misrepresents the image, respond with: {"accurate": false, "explanation": "concise explanation"}

Keep explanations under 100 words. Prioritize objective visual elements.
IMPORTANT: Only return the JSON object, no additional text before or after."#;

/// A review plus a 1-5 score.
pub const REVIEW_SCORE_PROMPT: &str = r#"You're a review validator. Analyze the user's review text and score.
Your response MUST be valid JSON in this format: {"accurate": boolean, "explanation": "string"}

If the score (1-5) makes sense for the given review text, respond with: {"accurate": true, "explanation": "brief confirmation"}
If the score doesn't match the sentiment of the review (e.g. positive review with 1/5 score), respond with: {"accurate": false, "explanation": "concise explanation"}

Keep explanations under 100 words. Be objective about whether the sentiment of the review matches the score.
IMPORTANT: Only return the JSON object, no additional text before or after."#;

/// The system prompt for a validator kind.
pub fn system_prompt(kind: ValidatorKind) -> &'static str {
    match kind {
        ValidatorKind::ImageDescription => IMAGE_DESCRIPTION_PROMPT,
        ValidatorKind::InlineImageReview => INLINE_IMAGE_REVIEW_PROMPT,
        ValidatorKind::ReviewScore => REVIEW_SCORE_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_retrieval() {
        assert!(system_prompt(ValidatorKind::ImageDescription).contains("image description"));
        assert!(system_prompt(ValidatorKind::InlineImageReview).contains("image review"));
        assert!(system_prompt(ValidatorKind::ReviewScore).contains("score (1-5)"));
    }

    #[test]
    fn test_all_prompts_demand_the_verdict_shape() {
        for kind in ValidatorKind::ALL {
            let prompt = system_prompt(kind);
            assert!(
                prompt.contains(r#"{"accurate": boolean, "explanation": "string"}"#),
                "{kind} prompt is missing the reply shape"
            );
            assert!(prompt.contains("under 100 words"));
            assert!(prompt.ends_with("no additional text before or after."));
        }
    }

    #[test]
    fn test_prompts_are_distinct() {
        assert_ne!(IMAGE_DESCRIPTION_PROMPT, INLINE_IMAGE_REVIEW_PROMPT);
        assert_ne!(INLINE_IMAGE_REVIEW_PROMPT, REVIEW_SCORE_PROMPT);
    }
}
