//! Attachment image + description loader.

use image::{DynamicImage, ImageReader};
use std::io::Cursor;

use super::LoadError;
use crate::payload::ValidatedPayload;
use crate::types::InboundMessage;
use crate::DEFAULT_IMAGE_QUESTION;

/// What the transport produced for one attachment reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAttachment {
    /// Raw bytes to decode
    Bytes(Vec<u8>),

    /// Not resolvable, not found, or not raw bytes; skipped
    Unresolved,
}

impl From<Option<Vec<u8>>> for ResolvedAttachment {
    fn from(value: Option<Vec<u8>>) -> Self {
        match value {
            Some(bytes) => ResolvedAttachment::Bytes(bytes),
            None => ResolvedAttachment::Unresolved,
        }
    }
}

/// Decode one attachment's bytes, sniffing the format from its contents.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    let invalid = |reason: String| LoadError::InvalidImage { reason };

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| invalid(e.to_string()))?
        .decode()
        .map_err(|e| invalid(e.to_string()))
}

/// Accumulates decoded attachments for one message.
///
/// Attachments are fed one at a time so the caller can resolve bytes lazily
/// and stop at the first undecodable blob: once [`push`](Self::push) returns
/// an error, the rest of the message's attachments should be discarded.
#[derive(Debug, Default)]
pub struct ImageClaimLoader {
    images: Vec<DynamicImage>,
}

impl ImageClaimLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one resolved attachment. Unresolved attachments are skipped.
    pub fn push(&mut self, attachment: ResolvedAttachment) -> Result<(), LoadError> {
        if let ResolvedAttachment::Bytes(bytes) = attachment {
            self.images.push(decode_image(&bytes)?);
        }
        Ok(())
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Finish the message: at least one image is required.
    pub fn finish(self, message: &InboundMessage) -> Result<ValidatedPayload, LoadError> {
        if self.images.is_empty() {
            return Err(LoadError::NoImages);
        }

        let claim_text = message.text().unwrap_or(DEFAULT_IMAGE_QUESTION).to_string();

        Ok(ValidatedPayload::ImageClaim {
            images: self.images,
            claim_text,
        })
    }
}

/// Load an image claim from already-resolved attachments, in order.
pub fn load_image_claim<I>(message: &InboundMessage, attachments: I) -> Result<ValidatedPayload, LoadError>
where
    I: IntoIterator<Item = ResolvedAttachment>,
{
    let mut loader = ImageClaimLoader::new();
    for attachment in attachments {
        loader.push(attachment)?;
    }
    loader.finish(message)
}
