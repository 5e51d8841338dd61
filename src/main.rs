//! Resyme CLI entry point.

use anyhow::Result;
use clap::Parser;
use resyme::cli::{commands, Cli, Commands};
use resyme::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("resyme={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Summarize {
            input,
            output,
            lang,
            model,
            stdout,
            no_transcript,
        } => {
            commands::run_summarize(
                input,
                output.clone(),
                lang.clone(),
                model.clone(),
                *stdout,
                *no_transcript,
                settings,
            )
            .await?;
        }

        Commands::Transcript {
            input,
            lang,
            output,
            format,
        } => {
            commands::run_transcript(input, lang.clone(), output.clone(), format, settings).await?;
        }

        Commands::Metadata { input } => {
            commands::run_metadata(input, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
