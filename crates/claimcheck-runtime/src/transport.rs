//! The messaging transport a validator runs against.
//!
//! A transport lists the inbound messages of a run, resolves attachment
//! references to bytes on demand, and accepts outbound replies. Replies are
//! plain text; the pipeline emits exactly one per processed user message.

use async_trait::async_trait;
use claimcheck_core::InboundMessage;
use parking_lot::Mutex;
use std::collections::HashMap;

/// The transport capability.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Messages for this run, in delivery order.
    async fn list_messages(&self) -> Vec<InboundMessage>;

    /// Bytes behind an attachment id, or `None` if the id is unknown.
    async fn resolve_attachment_bytes(&self, file_id: &str) -> Option<Vec<u8>>;

    /// Send a reply to the requester.
    async fn reply(&self, text: &str);
}

/// In-memory transport for tests and embedding.
///
/// Records every reply and every attachment lookup so callers can assert on
/// both.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    messages: Vec<InboundMessage>,
    files: HashMap<String, Vec<u8>>,
    replies: Mutex<Vec<String>>,
    resolutions: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new(messages: Vec<InboundMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Register bytes under an attachment id.
    pub fn with_file(mut self, file_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.files.insert(file_id.into(), bytes);
        self
    }

    /// Replies sent so far.
    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().clone()
    }

    /// Drain the replies, leaving the transport ready for another run.
    pub fn take_replies(&self) -> Vec<String> {
        std::mem::take(&mut *self.replies.lock())
    }

    /// Attachment ids looked up so far, in order.
    pub fn resolutions(&self) -> Vec<String> {
        self.resolutions.lock().clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn list_messages(&self) -> Vec<InboundMessage> {
        self.messages.clone()
    }

    async fn resolve_attachment_bytes(&self, file_id: &str) -> Option<Vec<u8>> {
        self.resolutions.lock().push(file_id.to_string());
        self.files.get(file_id).cloned()
    }

    async fn reply(&self, text: &str) {
        self.replies.lock().push(text.to_string());
    }
}
