//! Review + score loader.

use serde_json::Value as JsonValue;

use super::{LoadError, REVIEW_SCORE_SHAPE};
use crate::payload::{Score, ValidatedPayload};
use crate::types::InboundMessage;

const MISSING_CONTENT: &str =
    "Please provide review data in JSON format with 'review' and 'score' fields";

/// Load `{"review": "<text>", "score": <1-5>}` from the message body.
///
/// Checks run in a fixed order so the first failing check names the problem:
/// content present, valid JSON, JSON object, both keys present, review is a
/// non-empty string, score coerces to a number, score is in `[1, 5]`.
pub fn load_review_score(message: &InboundMessage) -> Result<ValidatedPayload, LoadError> {
    let content = message.text().ok_or(LoadError::MissingContent {
        request: MISSING_CONTENT,
    })?;

    let data: JsonValue = serde_json::from_str(content.trim()).map_err(|_| LoadError::InvalidJson {
        expected: REVIEW_SCORE_SHAPE,
    })?;

    let object = data.as_object().ok_or(LoadError::NotAnObject)?;

    let (review, score) = match (object.get("review"), object.get("score")) {
        (Some(review), Some(score)) => (review, score),
        _ => return Err(LoadError::MissingReviewOrScore),
    };

    let review_text = match review.as_str() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => return Err(LoadError::InvalidReview),
    };

    let (value, literal) = coerce_score(score)?;
    let score = Score::new(value, literal.clone()).ok_or(LoadError::ScoreOutOfRange { literal })?;

    Ok(ValidatedPayload::ReviewScoreClaim { review_text, score })
}

/// Coerce a JSON value to a real number.
///
/// Numbers and numeric strings are accepted; booleans, null, arrays and
/// objects are not.
fn coerce_score(value: &JsonValue) -> Result<(f64, String), LoadError> {
    match value {
        JsonValue::Number(number) => number
            .as_f64()
            .map(|v| (v, number.to_string()))
            .ok_or(LoadError::ScoreNotNumeric),
        JsonValue::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<f64>()
                .map(|v| (v, trimmed.to_string()))
                .map_err(|_| LoadError::ScoreNotNumeric)
        }
        _ => Err(LoadError::ScoreNotNumeric),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DiagnosticKind;
    use proptest::prelude::*;

    fn load(body: &str) -> Result<ValidatedPayload, LoadError> {
        load_review_score(&InboundMessage::user(body))
    }

    #[test]
    fn test_valid_review_and_score() {
        let payload = load(r#"{"review": "Arrived broken", "score": 1}"#).unwrap();
        match payload {
            ValidatedPayload::ReviewScoreClaim { review_text, score } => {
                assert_eq!(review_text, "Arrived broken");
                assert_eq!(score.value(), 1.0);
                assert_eq!(score.literal(), "1");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(load("  \n{\"review\": \"fine\", \"score\": 3}\n ").is_ok());
    }

    #[test]
    fn test_numeric_string_score_is_coerced() {
        let payload = load(r#"{"review": "Decent", "score": " 3.5 "}"#).unwrap();
        match payload {
            ValidatedPayload::ReviewScoreClaim { score, .. } => {
                assert_eq!(score.value(), 3.5);
                assert_eq!(score.literal(), "3.5");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_empty_content_is_soft_skip() {
        let err = load("").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::SoftSkip);
        assert!(err.to_string().contains("Please provide review data"));

        let mut message = InboundMessage::user("");
        message.content = None;
        assert_eq!(
            load_review_score(&message).unwrap_err().kind(),
            DiagnosticKind::SoftSkip
        );
    }

    #[test]
    fn test_invalid_json_names_expected_shape() {
        let err = load("review: good, score: 5").unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson { .. }));
        assert!(err.to_string().contains(r#""review""#));
        assert!(err.to_string().contains(r#""score""#));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert_eq!(load("[1, 2]").unwrap_err(), LoadError::NotAnObject);
        assert_eq!(load("\"text\"").unwrap_err(), LoadError::NotAnObject);
    }

    #[test]
    fn test_missing_fields() {
        for body in [
            r#"{"review": "no score"}"#,
            r#"{"score": 4}"#,
            r#"{}"#,
        ] {
            let err = load(body).unwrap_err();
            assert_eq!(err, LoadError::MissingReviewOrScore);
            assert!(err
                .diagnostic()
                .contains("must contain 'review' and 'score' fields"));
        }
    }

    #[test]
    fn test_review_must_be_non_empty_string() {
        assert_eq!(
            load(r#"{"review": "", "score": 4}"#).unwrap_err(),
            LoadError::InvalidReview
        );
        assert_eq!(
            load(r#"{"review": 42, "score": 4}"#).unwrap_err(),
            LoadError::InvalidReview
        );
        assert_eq!(
            load(r#"{"review": null, "score": 4}"#).unwrap_err(),
            LoadError::InvalidReview
        );
    }

    #[test]
    fn test_out_of_range_scores() {
        for body in [
            r#"{"review": "x", "score": 0}"#,
            r#"{"review": "x", "score": 5.1}"#,
            r#"{"review": "x", "score": -3}"#,
            r#"{"review": "x", "score": "NaN"}"#,
        ] {
            let err = load(body).unwrap_err();
            assert!(
                matches!(err, LoadError::ScoreOutOfRange { .. }),
                "{} gave {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_non_numeric_scores() {
        for body in [
            r#"{"review": "x", "score": "bad"}"#,
            r#"{"review": "x", "score": true}"#,
            r#"{"review": "x", "score": null}"#,
            r#"{"review": "x", "score": [4]}"#,
            r#"{"review": "x", "score": {"value": 4}}"#,
        ] {
            assert_eq!(load(body).unwrap_err(), LoadError::ScoreNotNumeric, "{}", body);
        }
    }

    proptest! {
        #[test]
        fn prop_in_range_scores_load(score in 1.0f64..=5.0) {
            let body = serde_json::json!({"review": "ok", "score": score}).to_string();
            prop_assert!(load(&body).is_ok());
        }

        #[test]
        fn prop_out_of_range_scores_reject(score in prop_oneof![-1000.0f64..0.999, 5.001f64..1000.0]) {
            let body = serde_json::json!({"review": "ok", "score": score}).to_string();
            let err = load(&body).unwrap_err();
            prop_assert!(err.is_score_error());
        }
    }
}
