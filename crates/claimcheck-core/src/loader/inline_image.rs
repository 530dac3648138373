//! Inline base64 image + review loader.

use serde_json::Value as JsonValue;

use super::{LoadError, INLINE_IMAGE_SHAPE};
use crate::payload::ValidatedPayload;
use crate::types::InboundMessage;
use crate::DEFAULT_INLINE_REVIEW_QUESTION;

const MISSING_CONTENT: &str =
    r#"Please provide image data in JSON format: {"image": "<base64>", "review": "<text>"}"#;

/// Load `{"image": "<base64>", "review"?: "<text>"}` from the message body.
///
/// A data-URI prefix on `image` is stripped. The base64 payload itself is
/// not decoded or re-validated here.
pub fn load_inline_image(message: &InboundMessage) -> Result<ValidatedPayload, LoadError> {
    let content = message.text().ok_or(LoadError::MissingContent {
        request: MISSING_CONTENT,
    })?;

    let data: JsonValue = serde_json::from_str(content.trim()).map_err(|_| LoadError::InvalidJson {
        expected: INLINE_IMAGE_SHAPE,
    })?;

    let object = data.as_object().ok_or(LoadError::NotAnObject)?;

    let image = match object.get("image") {
        None | Some(JsonValue::Null) => return Err(LoadError::MissingImage),
        Some(JsonValue::String(image)) => image,
        Some(_) => return Err(LoadError::ImageNotString),
    };

    let image_base64 = strip_data_uri_prefix(image);
    if image_base64.is_empty() {
        return Err(LoadError::MissingImage);
    }

    let review_text = match object.get("review") {
        None | Some(JsonValue::Null) => DEFAULT_INLINE_REVIEW_QUESTION.to_string(),
        Some(JsonValue::String(review)) => review.clone(),
        Some(_) => return Err(LoadError::ReviewNotString),
    };

    Ok(ValidatedPayload::InlineImageClaim {
        image_base64: image_base64.to_string(),
        review_text,
    })
}

/// Drop everything up to and including the first comma, if there is one.
///
/// `data:image/png;base64,AAAA` becomes `AAAA`; a bare payload is returned
/// unchanged.
pub fn strip_data_uri_prefix(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, payload)) => payload,
        None => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DiagnosticKind;

    fn load(body: &str) -> Result<ValidatedPayload, LoadError> {
        load_inline_image(&InboundMessage::user(body))
    }

    fn unwrap_inline(payload: ValidatedPayload) -> (String, String) {
        match payload {
            ValidatedPayload::InlineImageClaim {
                image_base64,
                review_text,
            } => (image_base64, review_text),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_data_uri_prefix_is_stripped() {
        let payload = load(r#"{"image":"data:image/png;base64,AAAA","review":"ok"}"#).unwrap();
        let (image, review) = unwrap_inline(payload);
        assert_eq!(image, "AAAA");
        assert_eq!(review, "ok");
    }

    #[test]
    fn test_bare_payload_is_kept() {
        let (image, _) = unwrap_inline(load(r#"{"image":"/9j/4AAQ"}"#).unwrap());
        assert_eq!(image, "/9j/4AAQ");
    }

    #[test]
    fn test_only_first_comma_splits() {
        assert_eq!(strip_data_uri_prefix("data:x,AA,BB"), "AA,BB");
        assert_eq!(strip_data_uri_prefix("AAAA"), "AAAA");
    }

    #[test]
    fn test_missing_review_uses_default_question() {
        let (_, review) = unwrap_inline(load(r#"{"image":"AAAA"}"#).unwrap());
        assert_eq!(review, DEFAULT_INLINE_REVIEW_QUESTION);

        let (_, review) = unwrap_inline(load(r#"{"image":"AAAA","review":null}"#).unwrap());
        assert_eq!(review, DEFAULT_INLINE_REVIEW_QUESTION);
    }

    #[test]
    fn test_invalid_json_names_expected_shape() {
        let err = load("not json").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::MalformedInput);
        assert!(err
            .to_string()
            .contains(r#"{"image": "<base64>", "review": "<text>"}"#));
    }

    #[test]
    fn test_empty_content_is_soft_skip() {
        let err = load("").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::SoftSkip);
        assert!(err.diagnostic().contains("Please provide image data"));
    }

    #[test]
    fn test_image_field_checks() {
        assert_eq!(load(r#"{"review":"ok"}"#).unwrap_err(), LoadError::MissingImage);
        assert_eq!(load(r#"{"image":""}"#).unwrap_err(), LoadError::MissingImage);
        assert_eq!(
            load(r#"{"image":"data:image/png;base64,"}"#).unwrap_err(),
            LoadError::MissingImage
        );
        assert_eq!(load(r#"{"image":123}"#).unwrap_err(), LoadError::ImageNotString);
        assert_eq!(load(r#"[]"#).unwrap_err(), LoadError::NotAnObject);
    }

    #[test]
    fn test_empty_image_string_reports_missing_image() {
        let err = load(r#"{"image":"","review":"ok"}"#).unwrap_err();
        assert_eq!(err, LoadError::MissingImage);
        assert_eq!(err.diagnostic(), "⚠️ JSON must contain an 'image' field");
    }

    #[test]
    fn test_non_string_review_is_rejected() {
        assert_eq!(
            load(r#"{"image":"AAAA","review":5}"#).unwrap_err(),
            LoadError::ReviewNotString
        );
    }
}
