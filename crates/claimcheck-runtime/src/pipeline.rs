//! The verdict dispatcher.
//!
//! A [`ValidationPipeline`] walks the transport's messages strictly in order
//! and, for each user message, runs load → render → complete → reply. Every
//! processed message produces exactly one reply:
//!
//! | Step fails | Reply | Outcome |
//! |------------|-------|---------|
//! | load, soft skip | `🖼️`/`📝` request for input | [`MessageOutcome::Skipped`] |
//! | load, malformed | `⚠️` explanation | [`MessageOutcome::Rejected`] |
//! | render | `⚠️` explanation | [`MessageOutcome::Rejected`] |
//! | complete | `🔧 Error processing request: ...` | [`MessageOutcome::Failed`] |
//! | nothing | the model's text, verbatim | [`MessageOutcome::Relayed`] |
//!
//! Nothing is retried and no failure ends the run early. Completions are only
//! bounded when [`RuntimeConfig::timeout`] is set.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use claimcheck_core::{
    ChatMessage, Diagnostic, DiagnosticKind, InboundMessage, ValidatorKind, Verdict,
};

use crate::config::{HistoryMode, RuntimeConfig};
use crate::providers::{
    CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use crate::transport::Transport;
use crate::validators::ClaimValidator;
use crate::RuntimeError;

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MessageOutcome {
    /// Not a user message; no reply
    Ignored,

    /// Recognized but empty input
    Skipped { diagnostic: String },

    /// Malformed input
    Rejected { diagnostic: String },

    /// The model answered and its text was relayed
    Relayed { verdict: Verdict, usage: TokenUsage },

    /// The completion call failed
    Failed { diagnostic: String },
}

impl From<Diagnostic> for MessageOutcome {
    fn from(diagnostic: Diagnostic) -> Self {
        let Diagnostic { kind, text } = diagnostic;
        match kind {
            DiagnosticKind::SoftSkip => MessageOutcome::Skipped { diagnostic: text },
            DiagnosticKind::MalformedInput => MessageOutcome::Rejected { diagnostic: text },
            DiagnosticKind::DownstreamFault => MessageOutcome::Failed { diagnostic: text },
        }
    }
}

impl MessageOutcome {
    /// Whether a reply was sent for this message.
    pub fn replied(&self) -> bool {
        !matches!(self, MessageOutcome::Ignored)
    }
}

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub validator: ValidatorKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// One entry per listed message, in order
    pub outcomes: Vec<MessageOutcome>,
}

impl RunReport {
    pub fn relayed(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Relayed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Skipped { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Rejected { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Failed { .. }))
    }

    pub fn ignored(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Ignored))
    }

    /// Total tokens across relayed verdicts.
    pub fn total_tokens(&self) -> u32 {
        self.outcomes
            .iter()
            .map(|o| match o {
                MessageOutcome::Relayed { usage, .. } => usage.total(),
                _ => 0,
            })
            .sum()
    }

    /// Relayed verdicts in message order.
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.outcomes.iter().filter_map(|o| match o {
            MessageOutcome::Relayed { verdict, .. } => Some(verdict),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&MessageOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Runs one validator over a transport.
pub struct ValidationPipeline {
    provider: Arc<dyn LlmProvider>,
    validator: Arc<dyn ClaimValidator>,
    config: RuntimeConfig,
}

impl ValidationPipeline {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        validator: Arc<dyn ClaimValidator>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            provider,
            validator,
            config,
        }
    }

    pub fn builder() -> ValidationPipelineBuilder {
        ValidationPipelineBuilder::new()
    }

    pub fn kind(&self) -> ValidatorKind {
        self.validator.kind()
    }

    /// Process every message the transport lists.
    ///
    /// History is local to the call, so two runs over the same transport
    /// content send the same prompts.
    pub async fn run(&self, transport: &dyn Transport) -> RunReport {
        let started_at = Utc::now();
        let validator = self.validator.kind();
        let completion = self.config.completion_config();

        let messages = transport.list_messages().await;
        tracing::info!(
            validator = %validator,
            provider = self.provider.name(),
            messages = messages.len(),
            "Starting validation run"
        );

        let mut history = vec![ChatMessage::system(self.validator.system_prompt())];
        let mut outcomes = Vec::with_capacity(messages.len());

        for (index, message) in messages.iter().enumerate() {
            let outcome = self
                .process(index, message, transport, &mut history, &completion)
                .await;
            outcomes.push(outcome);
        }

        let report = RunReport {
            validator,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        tracing::info!(
            validator = %validator,
            relayed = report.relayed(),
            skipped = report.skipped(),
            rejected = report.rejected(),
            failed = report.failed(),
            ignored = report.ignored(),
            tokens = report.total_tokens(),
            "Validation run finished"
        );

        report
    }

    async fn process(
        &self,
        index: usize,
        message: &InboundMessage,
        transport: &dyn Transport,
        history: &mut Vec<ChatMessage>,
        completion: &CompletionConfig,
    ) -> MessageOutcome {
        if !message.is_user() {
            tracing::debug!(message_index = index, role = %message.role, "Ignoring non-user message");
            return MessageOutcome::Ignored;
        }

        let payload = match self.validator.load(message, transport).await {
            Ok(payload) => payload,
            Err(err) => {
                if err.kind() == DiagnosticKind::SoftSkip {
                    tracing::info!(message_index = index, reason = %err, "Skipping message");
                } else {
                    tracing::warn!(message_index = index, error = %err, "Rejecting message");
                }
                return Self::report(transport, Diagnostic::from(&err)).await;
            }
        };

        let turn = match self.validator.render(&payload) {
            Ok(turn) => turn,
            Err(err) => {
                tracing::warn!(message_index = index, error = %err, "Prompt rendering failed");
                return Self::report(transport, Diagnostic::malformed(&err)).await;
            }
        };

        let request = match self.config.history {
            HistoryMode::Accumulate => {
                history.push(turn);
                history.clone()
            }
            HistoryMode::Isolated => vec![history[0].clone(), turn],
        };

        tracing::debug!(message_index = index, turns = request.len(), "Requesting completion");

        match self.complete(request, completion).await {
            Ok(response) => {
                transport.reply(&response.content).await;
                tracing::info!(
                    message_index = index,
                    model = %response.model,
                    tokens = response.usage.total(),
                    "Verdict relayed"
                );
                MessageOutcome::Relayed {
                    verdict: Verdict::new(response.content),
                    usage: response.usage,
                }
            }
            Err(err) => {
                tracing::warn!(message_index = index, error = %err, "Completion failed");
                Self::report(transport, Diagnostic::downstream_fault(&err)).await
            }
        }
    }

    async fn report(transport: &dyn Transport, diagnostic: Diagnostic) -> MessageOutcome {
        transport.reply(&diagnostic.text).await;
        MessageOutcome::from(diagnostic)
    }

    /// One completion call, bounded by the configured timeout if there is one.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        completion: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let call = self.provider.complete(messages, completion);
        match completion.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderError::Timeout(limit))?,
            None => call.await,
        }
    }
}

/// Builder for [`ValidationPipeline`].
pub struct ValidationPipelineBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    validator: Option<Arc<dyn ClaimValidator>>,
    config: RuntimeConfig,
}

impl ValidationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            validator: None,
            config: RuntimeConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn validator(mut self, validator: Arc<dyn ClaimValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ValidationPipeline, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::ProviderNotConfigured("No provider set".to_string()))?;
        let validator = self.validator.ok_or(RuntimeError::ValidatorNotConfigured)?;
        self.config.validate()?;

        Ok(ValidationPipeline::new(provider, validator, self.config))
    }
}

impl Default for ValidationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
