//! Summarize command implementation.

use super::{check_input, progress_sink};
use crate::cli::{Output, ProcessingSlot};
use crate::config::{Prompts, Settings};
use crate::note::render_note;
use crate::prompt::PromptBuilder;
use crate::summarize::create_summarizer;
use crate::youtube::AcquisitionPipeline;
use anyhow::Result;

/// Run the summarize command.
#[allow(clippy::too_many_arguments)]
pub async fn run_summarize(
    input: &str,
    output: Option<String>,
    lang: Option<String>,
    model: Option<String>,
    stdout: bool,
    no_transcript: bool,
    mut settings: Settings,
) -> Result<()> {
    let _slot = ProcessingSlot::acquire()?;
    check_input(input)?;

    if let Some(model) = model {
        settings.summary.model = model;
    }
    let language = lang.unwrap_or_else(|| settings.youtube.language.clone());

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let builder = PromptBuilder::new(prompts, settings.summary.max_transcript_chars);
    let summarizer = create_summarizer(&settings.summary);

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

    // Captions being absent is not a failure; the note is built from
    // metadata instead.
    let user_prompt = if transcript.has_captions() {
        spinner.set_message(format!(
            "Summarizing {} caption lines...",
            transcript.lines.len()
        ));
        builder.transcript_prompt(&transcript)
    } else {
        spinner.println(">> No captions available; summarizing from metadata");
        let metadata = pipeline.fetch_metadata(input).await?;
        spinner.set_message("Summarizing from metadata...");
        builder.metadata_prompt(&metadata)
    };

    let summary = match summarizer
        .summarize(builder.system_prompt(), &user_prompt)
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Summarization failed: {e}"));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    let include_transcript = settings.summary.include_transcript && !no_transcript;
    let note = render_note(&transcript, &summary, include_transcript);

    if stdout {
        println!("{note}");
        return Ok(());
    }

    let path = match output {
        Some(path) => std::path::PathBuf::from(path),
        None => {
            let dir = settings.notes_dir();
            std::fs::create_dir_all(&dir)?;
            dir.join(format!("{}.md", transcript.video.video_id))
        }
    };
    std::fs::write(&path, note)?;
    Output::success(&format!(
        "Summarized '{}' to {}",
        transcript.title,
        path.display()
    ));

    Ok(())
}
