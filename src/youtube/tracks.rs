//! Caption track model and language resolution.

use serde::Deserialize;

/// One caption track exposed by the player metadata.
///
/// Tracks exist only transiently inside a single fetch-and-resolve call;
/// `base_url` is an opaque, time-limited, signed fetch target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    #[serde(default)]
    pub name: Option<TrackName>,
    /// "asr" marks auto-generated tracks.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub vss_id: Option<String>,
}

/// Track label; the player response carries either a simple string or runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackName {
    #[serde(default)]
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Option<Vec<TrackNameRun>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackNameRun {
    pub text: String,
}

impl CaptionTrack {
    /// Human-readable track label, falling back to the language code.
    pub fn display_name(&self) -> &str {
        self.name
            .as_ref()
            .and_then(|n| {
                n.simple_text
                    .as_deref()
                    .or_else(|| n.runs.as_ref().and_then(|r| r.first()).map(|r| r.text.as_str()))
            })
            .unwrap_or(&self.language_code)
    }

    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// How the resolved track relates to the requested language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMatch {
    /// Track language equals the requested code.
    Exact,
    /// Requested `en`, track `en-US`.
    Prefix,
    /// Requested `en-GB`, track `en`.
    ReversePrefix,
    /// No language overlap; the first listed track was used instead.
    Fallback,
}

fn pick<'a>(
    tracks: &'a [CaptionTrack],
    pred: impl Fn(&CaptionTrack) -> bool,
) -> Option<&'a CaptionTrack> {
    // Within a tier, a manually-authored track beats an auto-generated one.
    tracks
        .iter()
        .find(|t| pred(t) && !t.is_auto_generated())
        .or_else(|| tracks.iter().find(|t| pred(t)))
}

/// Select the best caption track for `requested`.
///
/// Priority: exact language match, then locale-prefix match in either
/// direction, then the first listed track. Most videos only expose
/// auto-generated captions in a single language, so falling back to an
/// arbitrary track beats returning nothing. `None` means the video has no
/// caption tracks at all, which callers must treat as "no captions
/// available", not as an error.
pub fn resolve_caption_track<'a>(
    tracks: &'a [CaptionTrack],
    requested: &str,
) -> Option<(&'a CaptionTrack, TrackMatch)> {
    if let Some(track) = pick(tracks, |t| t.language_code == requested) {
        return Some((track, TrackMatch::Exact));
    }

    let prefix = format!("{requested}-");
    if let Some(track) = pick(tracks, |t| t.language_code.starts_with(&prefix)) {
        return Some((track, TrackMatch::Prefix));
    }

    if let Some(track) = pick(tracks, |t| {
        requested.starts_with(&format!("{}-", t.language_code))
    }) {
        return Some((track, TrackMatch::ReversePrefix));
    }

    tracks.first().map(|t| (t, TrackMatch::Fallback))
}
