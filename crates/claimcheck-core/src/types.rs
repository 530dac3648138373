//! Transport-facing types: inbound messages and their attachments.
//!
//! These mirror what the message transport hands us. Nothing here is trusted:
//! every field is optional or stringly-typed until a loader has checked it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Conversation role of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
    /// Any role the transport reports that we do not recognize
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(role) => role,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            other => Role::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from(raw.as_str()))
    }
}

/// An opaque reference to binary data attached to a message.
///
/// The transport resolves references to bytes on demand. A reference is only
/// usable when it carries a non-empty `file_id`; anything else is skipped by
/// the attachment loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    #[serde(default)]
    pub file_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl AttachmentRef {
    /// Reference a transport file by id.
    pub fn file(file_id: impl Into<String>) -> Self {
        Self {
            file_id: Some(file_id.into()),
            ..Default::default()
        }
    }

    /// The id to resolve, if this reference can be resolved at all.
    pub fn resolvable_id(&self) -> Option<&str> {
        self.file_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A message delivered by the transport. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub role: Role,

    /// Raw text or JSON-encoded text
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

impl InboundMessage {
    /// A user message with text content and no attachments.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            attachments: Vec::new(),
        }
    }

    /// A message with an arbitrary role.
    pub fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            attachments: Vec::new(),
        }
    }

    /// Attach a reference.
    pub fn attach(mut self, attachment: AttachmentRef) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Only user messages are ever loaded.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Content, treating an empty string the same as no content.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// The three validator pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidatorKind {
    /// Attached image(s) plus a free-text description
    #[serde(rename = "image")]
    ImageDescription,

    /// `{"image": "<base64>", "review": "<text>"}` in the message body
    #[serde(rename = "inline-image")]
    InlineImageReview,

    /// `{"review": "<text>", "score": <1-5>}` in the message body
    ReviewScore,
}

impl ValidatorKind {
    pub const ALL: [ValidatorKind; 3] = [
        ValidatorKind::ImageDescription,
        ValidatorKind::InlineImageReview,
        ValidatorKind::ReviewScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorKind::ImageDescription => "image",
            ValidatorKind::InlineImageReview => "inline-image",
            ValidatorKind::ReviewScore => "review-score",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown validator '{}', expected one of: image, inline-image, review-score",
                    s
                )
            })
    }
}
