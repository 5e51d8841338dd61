//! Parameter blobs for the internal transcript endpoint.
//!
//! The `get_transcript` endpoint takes an opaque `params` value: a base64 of
//! a protobuf-style message naming the video and the wanted caption track.
//! The byte layout below is reverse-engineered and can change without notice;
//! everything outside this module treats the blobs as opaque strings.

use crate::youtube::tracks::CaptionTrack;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Upper bound on parameter variants tried per request.
pub const MAX_PARAM_VARIANTS: usize = 5;

fn varint(mut value: usize) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    out
}

/// Wire type 2 field: `(field_number << 3) | 2`, length, payload.
fn length_delimited(field: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![(field << 3) | 2];
    out.extend(varint(payload.len()));
    out.extend_from_slice(payload);
    out
}

/// Inner track selector: field 1 = track kind ("asr" or absent for manual),
/// field 2 = language code. Carried base64-encoded inside the outer message.
fn track_selector(kind: &str, language: &str) -> Vec<u8> {
    let mut inner = Vec::new();
    if !kind.is_empty() {
        inner.extend(length_delimited(1, kind.as_bytes()));
    }
    inner.extend(length_delimited(2, language.as_bytes()));
    STANDARD.encode(inner).into_bytes()
}

fn transcript_params(video_id: &str, kind: &str, language: &str) -> String {
    let mut message = length_delimited(1, video_id.as_bytes());
    message.extend(length_delimited(2, &track_selector(kind, language)));
    STANDARD.encode(message)
}

/// Generate the bounded, ordered list of `params` variants for one request.
///
/// Auto-generated captions come first (most videos carry nothing else), then
/// manual tracks, repeated for the language of the first listed track when it
/// differs from the requested one.
pub fn transcript_params_variants(
    video_id: &str,
    language: &str,
    tracks: &[CaptionTrack],
) -> Vec<String> {
    let mut languages = vec![language.to_string()];
    if let Some(track) = tracks.first() {
        if !languages.contains(&track.language_code) {
            languages.push(track.language_code.clone());
        }
    }

    let mut variants = Vec::new();
    for lang in &languages {
        for kind in ["asr", ""] {
            let params = transcript_params(video_id, kind, lang);
            if !variants.contains(&params) {
                variants.push(params);
            }
        }
    }
    variants.truncate(MAX_PARAM_VARIANTS);
    variants
}
