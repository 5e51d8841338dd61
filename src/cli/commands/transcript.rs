//! Transcript command implementation.

use super::{check_input, progress_sink};
use crate::cli::{Output, ProcessingSlot};
use crate::config::Settings;
use crate::note::{format_transcript, TranscriptFormat};
use crate::youtube::AcquisitionPipeline;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(
    input: &str,
    lang: Option<String>,
    output: Option<String>,
    format: &str,
    settings: Settings,
) -> Result<()> {
    let _slot = ProcessingSlot::acquire()?;
    check_input(input)?;

    let format: TranscriptFormat = format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let language = lang.unwrap_or_else(|| settings.youtube.language.clone());

    let spinner = Output::spinner("Fetching captions...");
    let pipeline = AcquisitionPipeline::new(settings.youtube.innertube_config())?
        .with_empty_retries(settings.youtube.empty_retries)
        .with_events(progress_sink(spinner.clone()));

    let transcript = match pipeline.fetch_transcript(input, &language).await {
        Ok(transcript) => transcript,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to fetch transcript: {e}"));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    if !transcript.has_captions() {
        Output::warning(&format!(
            "'{}' has no captions; nothing to export",
            transcript.title
        ));
        return Ok(());
    }

    let rendered = format_transcript(&transcript, format)?;
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            Output::success(&format!(
                "Exported {} caption lines to {}",
                transcript.lines.len(),
                path
            ));
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
