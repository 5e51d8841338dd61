//! YouTube URL and video ID parsing.

use crate::error::{Result, ResymeError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A parsed reference to a single YouTube video.
///
/// Created once per request and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    /// The 11-character video identifier.
    pub video_id: String,
    /// The input the identifier was extracted from.
    pub source_url: String,
}

impl VideoRef {
    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches various YouTube URL formats and bare video IDs
        Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:[^\s\#]*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/|youtube\.com/live/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Cheap prefix check; lets callers short-circuit before running the full
/// acquisition pipeline.
pub fn is_youtube_url(url: &str) -> bool {
    let trimmed = url.trim();
    const PREFIXES: [&str; 6] = [
        "https://www.youtube.com/",
        "https://youtube.com/",
        "https://m.youtube.com/",
        "https://youtu.be/",
        "http://www.youtube.com/",
        "http://youtu.be/",
    ];
    PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Extract the 11-character video ID from any accepted YouTube URL form
/// (`watch?v=`, `youtu.be/`, `/embed/`, `/shorts/`, `/live/`, `/v/`) or a
/// bare ID.
pub fn parse_video_id(url: &str) -> Result<VideoRef> {
    let input = url.trim();
    let caps = video_id_regex()
        .captures(input)
        .ok_or_else(|| ResymeError::InvalidUrl(input.to_string()))?;

    // Group 1 (URL format) then group 2 (bare ID)
    let video_id = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ResymeError::InvalidUrl(input.to_string()))?;

    Ok(VideoRef {
        video_id,
        source_url: input.to_string(),
    })
}
