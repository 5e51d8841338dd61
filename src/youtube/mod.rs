//! YouTube transcript and metadata acquisition.
//!
//! Talks directly to YouTube's undocumented web/mobile player protocol: no
//! official API, no user-supplied API key. Videos expose their captions
//! through shifting, mutually inconsistent response shapes, so acquisition
//! is organized as a ladder of strategies over a handful of pure parsers:
//!
//! - `url` - video ID extraction from the accepted URL forms
//! - `client` - HTTP client impersonating known YouTube clients
//! - `metadata` - best-effort field extraction from fetched payloads
//! - `tracks` - caption track model and language resolution
//! - `captions` - caption payload parsing across observed schemas
//! - `params` - opaque parameter blobs for the internal transcript endpoint
//! - `acquire` - retry/fallback orchestration and the public pipeline
//!
//! All types here are request-scoped values; nothing is cached or shared
//! between requests.

pub mod acquire;
pub mod captions;
pub mod client;
pub mod metadata;
pub mod params;
pub mod tracks;
pub mod url;

pub use acquire::{AcquisitionEvent, AcquisitionPipeline, EventSink};
pub use client::{ClientProfile, InnerTubeClient, InnerTubeConfig, PlayerResponse};
pub use self::url::{is_youtube_url, parse_video_id, VideoRef};
pub use tracks::{resolve_caption_track, CaptionTrack, TrackMatch};

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timed caption line, decoded and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub text: String,
    pub offset_ms: u64,
    pub duration_ms: u64,
}

/// A fetched transcript with the identifying fields needed to present it.
///
/// `lines` may be empty: captions being unavailable is a valid terminal
/// state, not an error. Consumers branch on [`Transcript::has_captions`]
/// rather than on a failure path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video: VideoRef,
    pub title: String,
    pub author: String,
    pub channel_url: String,
    /// Caption lines in ascending offset order.
    pub lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn has_captions(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Concatenated caption text, one caption per line.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Video metadata, used when caption-based summarization is infeasible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video: VideoRef,
    pub title: String,
    pub description: String,
    pub author: String,
    pub channel_url: String,
    pub tags: Vec<String>,
    pub publish_date: Option<DateTime<Utc>>,
}

/// Thumbnail quality tiers with deterministic URL templates. No network
/// check is made that the image actually exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailQuality {
    Default,
    Medium,
    High,
    Standard,
    MaxRes,
}

impl ThumbnailQuality {
    fn file_stem(&self) -> &'static str {
        match self {
            ThumbnailQuality::Default => "default",
            ThumbnailQuality::Medium => "mqdefault",
            ThumbnailQuality::High => "hqdefault",
            ThumbnailQuality::Standard => "sddefault",
            ThumbnailQuality::MaxRes => "maxresdefault",
        }
    }
}

impl std::str::FromStr for ThumbnailQuality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ThumbnailQuality::Default),
            "medium" => Ok(ThumbnailQuality::Medium),
            "high" => Ok(ThumbnailQuality::High),
            "standard" => Ok(ThumbnailQuality::Standard),
            "maxres" => Ok(ThumbnailQuality::MaxRes),
            _ => Err(format!("Unknown thumbnail quality: {s}")),
        }
    }
}

impl VideoRef {
    /// Thumbnail URL for this video at the given quality tier.
    pub fn thumbnail_url(&self, quality: ThumbnailQuality) -> String {
        format!(
            "https://img.youtube.com/vi/{}/{}.jpg",
            self.video_id,
            quality.file_stem()
        )
    }
}

/// Fetch a transcript for `url` with default configuration.
pub async fn fetch_transcript(url: &str, language: &str) -> Result<Transcript> {
    AcquisitionPipeline::new(InnerTubeConfig::default())?
        .fetch_transcript(url, language)
        .await
}

/// Fetch video metadata for `url` with default configuration.
pub async fn fetch_video_metadata(url: &str) -> Result<VideoMetadata> {
    AcquisitionPipeline::new(InnerTubeConfig::default())?
        .fetch_metadata(url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_url_templates() {
        let video = parse_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(
            video.thumbnail_url(ThumbnailQuality::MaxRes),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
        assert_eq!(
            video.thumbnail_url(ThumbnailQuality::Default),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/default.jpg"
        );
        assert_eq!(
            "high".parse::<ThumbnailQuality>().unwrap(),
            ThumbnailQuality::High
        );
        assert!("ultra".parse::<ThumbnailQuality>().is_err());
    }

    #[test]
    fn plain_text_joins_lines() {
        let transcript = Transcript {
            video: parse_video_id("dQw4w9WgXcQ").unwrap(),
            title: "T".to_string(),
            author: "A".to_string(),
            channel_url: String::new(),
            lines: vec![
                TranscriptLine {
                    text: "one".to_string(),
                    offset_ms: 0,
                    duration_ms: 1000,
                },
                TranscriptLine {
                    text: "two".to_string(),
                    offset_ms: 1000,
                    duration_ms: 1000,
                },
            ],
        };
        assert!(transcript.has_captions());
        assert_eq!(transcript.plain_text(), "one\ntwo");
    }

    #[test]
    fn fetch_transcript_rejects_invalid_urls_before_any_io() {
        let err = tokio_test::block_on(fetch_transcript("not a url", "en")).unwrap_err();
        assert!(matches!(err, crate::error::ResymeError::InvalidUrl(_)));
    }

    #[test]
    fn empty_transcript_is_a_valid_state() {
        let transcript = Transcript {
            video: parse_video_id("dQw4w9WgXcQ").unwrap(),
            title: "T".to_string(),
            author: "A".to_string(),
            channel_url: String::new(),
            lines: Vec::new(),
        };
        assert!(!transcript.has_captions());
        assert_eq!(transcript.plain_text(), "");
    }
}
