//! Markdown note rendering and transcript export.

use crate::error::Result;
use crate::youtube::{ThumbnailQuality, Transcript};

/// Output format for exported transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// Caption text only, one line per caption.
    Text,
    /// `[MM:SS] text` lines.
    Timestamps,
    /// The full transcript structure as JSON.
    Json,
}

impl std::str::FromStr for TranscriptFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(TranscriptFormat::Text),
            "timestamps" | "ts" => Ok(TranscriptFormat::Timestamps),
            "json" => Ok(TranscriptFormat::Json),
            _ => Err(format!("Unknown transcript format: {s}")),
        }
    }
}

/// Format milliseconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(offset_ms: u64) -> String {
    let total_seconds = offset_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Export a transcript in the requested format.
pub fn format_transcript(transcript: &Transcript, format: TranscriptFormat) -> Result<String> {
    match format {
        TranscriptFormat::Text => Ok(transcript.plain_text()),
        TranscriptFormat::Timestamps => Ok(transcript
            .lines
            .iter()
            .map(|l| format!("[{}] {}", format_timestamp(l.offset_ms), l.text))
            .collect::<Vec<_>>()
            .join("\n")),
        TranscriptFormat::Json => Ok(serde_json::to_string_pretty(transcript)?),
    }
}

/// Render the final markdown note for a summarized video.
pub fn render_note(transcript: &Transcript, summary: &str, include_transcript: bool) -> String {
    let mut note = String::new();

    note.push_str(&format!("# {}\n\n", transcript.title));
    note.push_str(&format!(
        "![thumbnail]({})\n\n",
        transcript.video.thumbnail_url(ThumbnailQuality::MaxRes)
    ));
    note.push_str(&format!(
        "- Channel: [{}]({})\n",
        transcript.author, transcript.channel_url
    ));
    note.push_str(&format!("- Source: {}\n\n", transcript.video.watch_url()));

    note.push_str(summary.trim());
    note.push('\n');

    if include_transcript && transcript.has_captions() {
        note.push_str("\n## Transcript\n\n");
        for line in &transcript.lines {
            note.push_str(&format!(
                "[{}] {}\n",
                format_timestamp(line.offset_ms),
                line.text
            ));
        }
    }

    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::{parse_video_id, TranscriptLine};

    fn transcript() -> Transcript {
        Transcript {
            video: parse_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            title: "A Video".to_string(),
            author: "A Channel".to_string(),
            channel_url: "https://www.youtube.com/channel/UCx".to_string(),
            lines: vec![
                TranscriptLine {
                    text: "first".to_string(),
                    offset_ms: 0,
                    duration_ms: 2000,
                },
                TranscriptLine {
                    text: "second".to_string(),
                    offset_ms: 65_000,
                    duration_ms: 2000,
                },
            ],
        }
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_timestamp(0), "00:00");
        assert_eq!(format_timestamp(65_000), "01:05");
        assert_eq!(format_timestamp(3_725_000), "01:02:05");
    }

    #[test]
    fn timestamps_format_lists_lines() {
        let out = format_transcript(&transcript(), TranscriptFormat::Timestamps).unwrap();
        assert_eq!(out, "[00:00] first\n[01:05] second");
    }

    #[test]
    fn json_format_round_trips() {
        let out = format_transcript(&transcript(), TranscriptFormat::Json).unwrap();
        let parsed: Transcript = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.video.video_id, "dQw4w9WgXcQ");
    }

    #[test]
    fn note_contains_summary_and_optional_transcript() {
        let with = render_note(&transcript(), "The summary.", true);
        assert!(with.starts_with("# A Video"));
        assert!(with.contains("maxresdefault.jpg"));
        assert!(with.contains("The summary."));
        assert!(with.contains("## Transcript"));
        assert!(with.contains("[01:05] second"));

        let without = render_note(&transcript(), "The summary.", false);
        assert!(!without.contains("## Transcript"));
    }

    #[test]
    fn format_parses_from_string() {
        assert_eq!(
            "json".parse::<TranscriptFormat>().unwrap(),
            TranscriptFormat::Json
        );
        assert_eq!(
            "ts".parse::<TranscriptFormat>().unwrap(),
            TranscriptFormat::Timestamps
        );
        assert!("srt".parse::<TranscriptFormat>().is_err());
    }
}
