//! A transport backed by a transcript file.
//!
//! ```json
//! {
//!   "messages": [
//!     {"role": "user", "content": "A red bike", "attachments": [{"file_id": "bike"}]}
//!   ],
//!   "attachments": {"bike": "photos/bike.png"}
//! }
//! ```
//!
//! Attachment paths are relative to the transcript's directory. Replies go to
//! stdout, one per line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use claimcheck_runtime::{InboundMessage, Transport};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Transcript {
    pub messages: Vec<InboundMessage>,

    #[serde(default)]
    pub attachments: BTreeMap<String, PathBuf>,
}

impl Transcript {
    pub fn parse(source: &str) -> anyhow::Result<Self> {
        serde_json::from_str(source).context("transcript is not valid JSON")
    }
}

#[derive(Debug)]
pub struct FileTransport {
    transcript: Transcript,
    base_dir: PathBuf,
}

impl FileTransport {
    pub fn new(transcript: Transcript, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            transcript,
            base_dir: base_dir.into(),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript {}", path.display()))?;
        let transcript = Transcript::parse(&source)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(transcript, base_dir))
    }

    fn attachment_path(&self, file_id: &str) -> Option<PathBuf> {
        self.transcript
            .attachments
            .get(file_id)
            .map(|p| self.base_dir.join(p))
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn list_messages(&self) -> Vec<InboundMessage> {
        self.transcript.messages.clone()
    }

    async fn resolve_attachment_bytes(&self, file_id: &str) -> Option<Vec<u8>> {
        let path = self.attachment_path(file_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(file_id, path = %path.display(), error = %e, "Attachment unreadable");
                None
            }
        }
    }

    async fn reply(&self, text: &str) {
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_core::Role;

    #[test]
    fn test_transcript_parses_roles_and_attachments() {
        let transcript = Transcript::parse(
            r#"{
                "messages": [
                    {"role": "system", "content": "setup"},
                    {"role": "user", "attachments": [{"file_id": "a"}]}
                ],
                "attachments": {"a": "img/a.png"}
            }"#,
        )
        .unwrap();

        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[0].role, Role::System);
        assert_eq!(transcript.messages[1].content, None);
        assert_eq!(transcript.attachments["a"], PathBuf::from("img/a.png"));
    }

    #[tokio::test]
    async fn test_attachments_resolve_relative_to_transcript() {
        let dir = std::env::temp_dir().join(format!("claimcheck-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("blob.bin"), [1u8, 2, 3]).unwrap();

        let transcript = Transcript::parse(
            r#"{"messages": [], "attachments": {"blob": "blob.bin", "gone": "missing.bin"}}"#,
        )
        .unwrap();
        let transport = FileTransport::new(transcript, &dir);

        assert_eq!(transport.resolve_attachment_bytes("blob").await, Some(vec![1, 2, 3]));
        assert_eq!(transport.resolve_attachment_bytes("gone").await, None);
        assert_eq!(transport.resolve_attachment_bytes("unknown").await, None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
