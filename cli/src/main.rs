//! CLI entrypoint for two-sages
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use sages_application::{
    NoProgress, ProgressNotifier, RunCouncilError, RunCouncilInput, RunCouncilUseCase,
};
use sages_infrastructure::{ConfigLoader, LoadedConfig, ProviderRouter};
use sages_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress, read_prompt,
};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the streamed opinion
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_cancelled(&e) => {
            warn!("Run cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<RunCouncilError>()
        .is_some_and(RunCouncilError::is_cancelled)
}

fn load_config(cli: &Cli) -> LoadedConfig {
    if cli.no_config {
        return ConfigLoader::load_defaults();
    }

    match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load configuration, using defaults: {}", e);
            ConfigLoader::load_defaults()
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting two-sages");

    // === Configuration ===
    ConfigLoader::load_dotenv();
    let config = load_config(&cli);

    // === Dependency Injection ===
    let providers = ProviderRouter::new(config.providers.clone())
        .build()
        .await
        .context("Failed to initialize providers")?;

    let use_case =
        RunCouncilUseCase::new(providers.first, providers.second, providers.synthesizer);

    // Positional prompt, or one line from stdin
    let question = match cli.prompt.clone() {
        Some(prompt) => prompt,
        None => read_prompt(&mut std::io::stdin().lock(), &mut std::io::stdout())
            .context("Failed to read prompt")?,
    };

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let input = RunCouncilInput::new(question)
        .with_behavior(&config.behavior)
        .with_cancellation(cancellation);

    let echo = cli.live_echo();
    let progress: Box<dyn ProgressNotifier> = match (cli.show_progress(), cli.plain) {
        (false, _) => Box::new(NoProgress),
        (true, true) => Box::new(SimpleProgress::new(echo)),
        (true, false) => Box::new(ProgressReporter::new(echo)),
    };

    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;

    // The opinion was already streamed to stdout
    if echo.stream {
        return Ok(());
    }

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    print!("{}", output);
    if cli.output == OutputFormat::Json {
        println!();
    }

    Ok(())
}
