//! Command implementations for the Resyme CLI.

mod config;
mod metadata;
mod summarize;
mod transcript;

pub use config::run_config;
pub use metadata::run_metadata;
pub use summarize::run_summarize;
pub use transcript::run_transcript;

use crate::cli::Output;
use crate::youtube::{is_youtube_url, parse_video_id, AcquisitionEvent};
use indicatif::ProgressBar;

/// Reject inputs that are neither a YouTube URL nor a bare video ID before
/// any network work happens.
pub(crate) fn check_input(input: &str) -> anyhow::Result<()> {
    if input.contains("://") && !is_youtube_url(input) {
        Output::error("Input doesn't appear to be a YouTube URL");
        anyhow::bail!("not a YouTube URL: {input}");
    }
    parse_video_id(input)?;
    Ok(())
}

/// Wire acquisition progress events onto a spinner.
pub(crate) fn progress_sink(pb: ProgressBar) -> Box<dyn Fn(AcquisitionEvent) + Send + Sync> {
    Box::new(move |event| match event {
        AcquisitionEvent::StrategyStarted { strategy } => {
            pb.set_message(format!("Fetching captions ({strategy})..."));
        }
        AcquisitionEvent::StrategyFailed { .. } => {
            pb.set_message("Trying alternate method...".to_string());
        }
        AcquisitionEvent::RetryingEmptyPayload { attempt } => {
            pb.set_message(format!("Empty caption payload, retrying ({attempt})..."));
        }
        AcquisitionEvent::LanguageFallback {
            requested,
            selected,
        } => {
            pb.println(format!(
                ">> No '{requested}' captions; using '{selected}' instead"
            ));
        }
        AcquisitionEvent::NoCaptions => {
            pb.set_message("No captions found".to_string());
        }
    })
}
