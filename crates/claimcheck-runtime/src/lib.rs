//! # claimcheck-runtime
//!
//! LLM-backed claim validator pipelines.
//!
//! This crate wires the deterministic pieces of `claimcheck-core` to the two
//! external collaborators a validator needs:
//!
//! - a [`Transport`] that lists inbound messages, resolves attachment bytes
//!   and accepts replies
//! - an [`LlmProvider`] that turns a message sequence into text
//!
//! One [`ValidationPipeline`] drives a single [`ClaimValidator`] strategy
//! over every message of a run, strictly in order: load → render → complete →
//! reply. Every failure produces exactly one diagnostic reply and the run moves
//! on to the next message; nothing is fatal to the run and nothing is retried.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use claimcheck_runtime::{
//!     validators, MemoryTransport, RuntimeConfig, ValidationPipeline, ValidatorKind,
//! };
//!
//! let config = RuntimeConfig::from_yaml_file("claimcheck.yaml")?;
//! let provider = config.build_provider(&ProviderRegistry::with_defaults())?;
//! let pipeline = ValidationPipeline::builder()
//!     .provider(provider)
//!     .validator(validators::for_kind(ValidatorKind::ReviewScore))
//!     .config(config)
//!     .build()?;
//!
//! let report = pipeline.run(&transport).await;
//! println!("{} verdicts relayed", report.relayed());
//! ```

pub mod config;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod transport;
pub mod validators;

pub use claimcheck_core::{InboundMessage, ValidatorKind, Verdict};
pub use config::{ConfigError, HistoryMode, ProviderSettings, RuntimeConfig};
pub use pipeline::{MessageOutcome, RunReport, ValidationPipeline, ValidationPipelineBuilder};
pub use providers::{LlmProvider, ProviderError, ProviderRegistry};
pub use transport::{MemoryTransport, Transport};
pub use validators::ClaimValidator;

use thiserror::Error;

/// Errors raised while assembling a pipeline.
///
/// Running a pipeline never fails: per-message problems become replies.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Validator not configured")]
    ValidatorNotConfigured,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
