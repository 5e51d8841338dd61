//! Metadata command implementation.

use super::check_input;
use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{AcquisitionPipeline, ThumbnailQuality};
use anyhow::Result;

/// Run the metadata command.
pub async fn run_metadata(input: &str, settings: Settings) -> Result<()> {
    check_input(input)?;

    let spinner = Output::spinner("Fetching metadata...");
    let pipeline = AcquisitionPipeline::new(settings.youtube.innertube_config())?;

    let metadata = match pipeline.fetch_metadata(input).await {
        Ok(metadata) => metadata,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to fetch metadata: {e}"));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    Output::header(&metadata.title);
    Output::kv("Video ID", &metadata.video.video_id);
    Output::kv("Channel", &metadata.author);
    if !metadata.channel_url.is_empty() {
        Output::kv("Channel URL", &metadata.channel_url);
    }
    if let Some(published) = metadata.publish_date {
        Output::kv("Published", &published.date_naive().to_string());
    }
    Output::kv(
        "Thumbnail",
        &metadata.video.thumbnail_url(ThumbnailQuality::MaxRes),
    );

    if !metadata.tags.is_empty() {
        Output::header("Tags");
        for tag in &metadata.tags {
            Output::list_item(tag);
        }
    }

    if !metadata.description.is_empty() {
        Output::header("Description");
        println!("{}", metadata.description);
    }

    Ok(())
}
