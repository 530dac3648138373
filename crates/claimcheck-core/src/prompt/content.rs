//! Role-tagged chat messages and their content blocks.
//!
//! Blocks serialize in the Chat Completions shape:
//! ```json
//! { "type": "text", "text": "..." }
//! { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,..." } }
//! ```
//! Providers with a different wire format convert from these.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// A self-describing image reference (a data URI or URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One block of a multimodal turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image block from a complete data URI or URL.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    /// Image block for base64 JPEG data.
    pub fn jpeg_base64(data: &str) -> Self {
        Self::image_url(build_data_uri("image/jpeg", data))
    }
}

/// Content of a chat message: plain text, or an ordered list of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// The text when this is plain-text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(_) => None,
        }
    }

    /// Content as blocks; plain text becomes a single text block.
    pub fn to_blocks(&self) -> Vec<ContentBlock> {
        match self {
            MessageContent::Text(text) => vec![ContentBlock::text(text.clone())],
            MessageContent::Blocks(blocks) => blocks.clone(),
        }
    }

    /// All text in this content, joined with newlines.
    pub fn joined_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    ContentBlock::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A chat message for completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a plain-text user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a multimodal user message.
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }
}

/// Split `data:<media type>;base64,<data>` into its parts.
pub fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (media_type, data) = rest.split_once(";base64,")?;
    if media_type.is_empty() || data.is_empty() {
        return None;
    }
    Some((media_type, data))
}

/// Build `data:<media type>;base64,<data>`.
pub fn build_data_uri(media_type: &str, data: &str) -> String {
    format!("data:{media_type};base64,{data}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_serialize_in_chat_completions_shape() {
        let message = ChatMessage::user_blocks(vec![
            ContentBlock::jpeg_base64("AAAA"),
            ContentBlock::text("A cat"),
        ]);
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "image_url");
        assert_eq!(
            json["content"][0]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
        assert_eq!(json["content"][1]["type"], "text");
        assert_eq!(json["content"][1]["text"], "A cat");
    }

    #[test]
    fn test_plain_text_content_serializes_as_string() {
        let json = serde_json::to_value(ChatMessage::system("Be terse.")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "Be terse.");
    }

    #[test]
    fn test_joined_text_skips_images() {
        let content = MessageContent::Blocks(vec![
            ContentBlock::text("first"),
            ContentBlock::jpeg_base64("AAAA"),
            ContentBlock::text("second"),
        ]);
        assert_eq!(content.joined_text(), "first\nsecond");
    }

    #[test]
    fn test_data_uri_helpers() {
        assert_eq!(
            parse_data_uri("data:image/jpeg;base64,/9j/4AAQ"),
            Some(("image/jpeg", "/9j/4AAQ"))
        );
        assert!(parse_data_uri("https://example.com/cat.png").is_none());
        assert!(parse_data_uri("data:image/png;base64,").is_none());
        assert_eq!(build_data_uri("image/png", "AAAA"), "data:image/png;base64,AAAA");
    }
}
