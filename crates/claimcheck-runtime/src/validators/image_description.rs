//! Attached images plus a description.

use async_trait::async_trait;
use claimcheck_core::loader::{ImageClaimLoader, ResolvedAttachment};
use claimcheck_core::{InboundMessage, LoadError, ValidatedPayload, ValidatorKind};

use super::ClaimValidator;
use crate::transport::Transport;

/// Resolves each attachment in order and decodes it as an image.
///
/// Resolution is lazy: the first undecodable attachment rejects the message
/// and the remaining attachments are never fetched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDescriptionValidator;

#[async_trait]
impl ClaimValidator for ImageDescriptionValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::ImageDescription
    }

    async fn load(
        &self,
        message: &InboundMessage,
        transport: &dyn Transport,
    ) -> Result<ValidatedPayload, LoadError> {
        let mut loader = ImageClaimLoader::new();

        for attachment in &message.attachments {
            let resolved = match attachment.resolvable_id() {
                Some(file_id) => {
                    let bytes = transport.resolve_attachment_bytes(file_id).await;
                    if bytes.is_none() {
                        tracing::debug!(file_id, "attachment did not resolve, skipping");
                    }
                    ResolvedAttachment::from(bytes)
                }
                None => ResolvedAttachment::Unresolved,
            };
            loader.push(resolved)?;
        }

        tracing::debug!(images = loader.image_count(), "attachments decoded");
        loader.finish(message)
    }
}
