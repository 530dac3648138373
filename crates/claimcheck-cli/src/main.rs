//! `claimcheck`: replay a transcript through one claim validator.
//!
//! Replies are printed to stdout in order; logs go to stderr.

mod transcript;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use claimcheck_runtime::{
    validators, HistoryMode, ProviderRegistry, RuntimeConfig, ValidationPipeline, ValidatorKind,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcript::FileTransport;

#[derive(Parser, Debug)]
#[command(name = "claimcheck", version, about = "Validate user claims with a hosted model")]
struct Cli {
    /// Validator to run: image, inline-image or review-score
    #[arg(short, long)]
    validator: ValidatorKind,

    /// Transcript JSON file
    #[arg(short, long)]
    transcript: PathBuf,

    /// Runtime config (YAML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the provider type from the config
    #[arg(long)]
    provider: Option<String>,

    /// Override the model id from the config
    #[arg(long)]
    model: Option<String>,

    /// Send each message without earlier turns
    #[arg(long, default_value_t = false)]
    isolated: bool,

    /// Print the run report as JSON to stderr when done
    #[arg(long, default_value_t = false)]
    report: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    if let Some(provider) = &cli.provider {
        config.provider.provider_type = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if cli.isolated {
        config.history = HistoryMode::Isolated;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = load_config(&cli)?;
    let provider = config.build_provider(&ProviderRegistry::with_defaults())?;
    if !provider.health_check().await {
        tracing::warn!(provider = provider.name(), "Provider reports it is not ready");
    }

    let transport = FileTransport::load(&cli.transcript)?;
    let pipeline = ValidationPipeline::builder()
        .provider(provider)
        .validator(validators::for_kind(cli.validator))
        .config(config)
        .build()?;

    let report = pipeline.run(&transport).await;

    for verdict in report.verdicts() {
        match verdict.inspect() {
            Ok(assessment) => tracing::info!(
                accurate = assessment.accurate,
                explanation = %assessment.explanation,
                "Verdict"
            ),
            Err(e) => tracing::warn!(error = %e, "Verdict is not in the requested shape"),
        }
    }

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
