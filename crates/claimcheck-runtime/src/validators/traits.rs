//! Validator strategy trait.

use async_trait::async_trait;
use claimcheck_core::{
    prompt, ChatMessage, InboundMessage, LoadError, PromptError, ValidatedPayload, ValidatorKind,
};

use crate::transport::Transport;

/// One claim validator: how to load a message and what to tell the model.
///
/// The pipeline is generic over this trait; a validator never calls the
/// model and never replies on its own. Loading may read attachment bytes
/// through the transport but must not send anything.
#[async_trait]
pub trait ClaimValidator: Send + Sync {
    fn kind(&self) -> ValidatorKind;

    /// The system turn at the head of every completion.
    fn system_prompt(&self) -> &'static str {
        crate::prompts::system_prompt(self.kind())
    }

    /// Turn a user message into a validated payload.
    async fn load(
        &self,
        message: &InboundMessage,
        transport: &dyn Transport,
    ) -> Result<ValidatedPayload, LoadError>;

    /// Render a payload into the user turn.
    fn render(&self, payload: &ValidatedPayload) -> Result<ChatMessage, PromptError> {
        prompt::render_user_turn(payload)
    }
}
