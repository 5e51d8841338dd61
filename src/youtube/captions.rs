//! Caption payload fetching and parsing.
//!
//! YouTube serves captions in several shapes depending on endpoint and
//! format parameter: srv3 XML (`<p t d>`, times in milliseconds), legacy
//! timedtext XML (`<text start dur>`, times in seconds), json3 event JSON,
//! and the `get_transcript` panel JSON. Each shape gets its own pure parser;
//! a sniffing step picks which to run, and the newer XML schema is tried
//! before the legacy one. Partial results from two schemas are never mixed.

use crate::error::{Result, ResymeError};
use crate::youtube::client::InnerTubeClient;
use crate::youtube::tracks::CaptionTrack;
use crate::youtube::TranscriptLine;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use url::Url;

/// Fetch the payload for a resolved caption track and parse it into lines.
///
/// The track URL is normalized against the configured origin and requested
/// in the srv3 format first; the bare URL (legacy timedtext) is fetched only
/// when the srv3 payload yields nothing.
pub async fn fetch_and_parse(
    client: &InnerTubeClient,
    track: &CaptionTrack,
) -> Result<Vec<TranscriptLine>> {
    let base = normalize_caption_url(&track.base_url, &client.config().base_url);
    let srv3 = with_format(&base, "srv3");

    let first = fetch_payload_lines(client, &srv3).await;
    match first {
        Err(ResymeError::EmptyCaptions) | Err(ResymeError::Parse(_)) if srv3 != base => {
            fetch_payload_lines(client, &base).await
        }
        other => other,
    }
}

async fn fetch_payload_lines(client: &InnerTubeClient, url: &str) -> Result<Vec<TranscriptLine>> {
    let payload = client.fetch_caption_payload(url).await?;
    parse_caption_payload(&payload)
}

/// Resolve a track URL against the YouTube origin and undo the ampersand
/// escaping that player JSON sometimes carries.
pub fn normalize_caption_url(base_url: &str, origin: &str) -> String {
    let unescaped = base_url.replace("\\u0026", "&");
    if unescaped.starts_with("http://") || unescaped.starts_with("https://") {
        return unescaped;
    }
    match Url::parse(origin).and_then(|o| o.join(&unescaped)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            unescaped.trim_start_matches('/')
        ),
    }
}

/// Append a `fmt` parameter unless the URL already pins one.
pub fn with_format(url: &str, fmt: &str) -> String {
    if url.contains("fmt=") {
        url.to_string()
    } else if url.contains('?') {
        format!("{url}&fmt={fmt}")
    } else {
        format!("{url}?fmt={fmt}")
    }
}

/// Parse a raw caption payload of any recognized shape.
///
/// An empty or line-less payload is [`ResymeError::EmptyCaptions`];
/// a structurally unreadable one is [`ResymeError::Parse`]. Callers may
/// retry the former with another track or strategy, the latter only with a
/// different request shape.
pub fn parse_caption_payload(payload: &str) -> Result<Vec<TranscriptLine>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(ResymeError::EmptyCaptions);
    }

    let mut lines = if trimmed.starts_with('{') {
        parse_json3_events(trimmed)?
    } else {
        let srv3 = parse_xml_elements(trimmed, b"p", XmlTimes::Milliseconds)?;
        if srv3.is_empty() {
            parse_xml_elements(trimmed, b"text", XmlTimes::Seconds)?
        } else {
            srv3
        }
    };

    if lines.is_empty() {
        return Err(ResymeError::EmptyCaptions);
    }
    // Document order matches ascending time in every observed payload, but
    // nothing upstream guarantees it.
    lines.sort_by_key(|l| l.offset_ms);
    Ok(lines)
}

/// How an XML schema encodes times.
#[derive(Clone, Copy, PartialEq, Eq)]
enum XmlTimes {
    /// srv3: `t`/`d` attributes, integer milliseconds.
    Milliseconds,
    /// Legacy timedtext: `start`/`dur` attributes, fractional seconds.
    Seconds,
}

fn parse_xml_elements(
    payload: &str,
    element: &[u8],
    times: XmlTimes,
) -> Result<Vec<TranscriptLine>> {
    let mut reader = Reader::from_str(payload);
    let mut lines = Vec::new();
    let mut current: Option<(u64, u64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) if e.name().as_ref() == element => {
                current = Some((
                    read_time(&e, times, TimeAttr::Offset)?,
                    read_time(&e, times, TimeAttr::Duration)?,
                    String::new(),
                ));
            }
            Ok(Event::Text(t)) => {
                if let Some((_, _, buf)) = current.as_mut() {
                    match t.decode() {
                        Ok(text) => buf.push_str(&text),
                        Err(_) => buf.push_str(&String::from_utf8_lossy(t.as_ref())),
                    }
                }
            }
            // Entity references come through as their own events; reassemble
            // them for the entity decoder downstream.
            Ok(Event::GeneralRef(r)) => {
                if let Some((_, _, buf)) = current.as_mut() {
                    buf.push('&');
                    buf.push_str(&String::from_utf8_lossy(&r));
                    buf.push(';');
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == element => {
                if let Some((offset_ms, duration_ms, buf)) = current.take() {
                    let text = clean_caption_text(&buf);
                    if !text.is_empty() {
                        lines.push(TranscriptLine {
                            text,
                            offset_ms,
                            duration_ms,
                        });
                    }
                }
            }
            Ok(_) => {}
            Err(e) => return Err(ResymeError::Parse(format!("caption XML: {e}"))),
        }
    }

    Ok(lines)
}

enum TimeAttr {
    Offset,
    Duration,
}

fn read_time(e: &BytesStart<'_>, times: XmlTimes, which: TimeAttr) -> Result<u64> {
    let name = match (times, &which) {
        (XmlTimes::Milliseconds, TimeAttr::Offset) => "t",
        (XmlTimes::Milliseconds, TimeAttr::Duration) => "d",
        (XmlTimes::Seconds, TimeAttr::Offset) => "start",
        (XmlTimes::Seconds, TimeAttr::Duration) => "dur",
    };
    let raw = match e.try_get_attribute(name) {
        Ok(Some(attr)) => attr
            .unescape_value()
            .map(|v| v.to_string())
            .unwrap_or_default(),
        Ok(None) => return Ok(0),
        Err(e) => return Err(ResymeError::Parse(format!("caption attribute: {e}"))),
    };
    let value = match times {
        XmlTimes::Milliseconds => raw.trim().parse::<u64>().unwrap_or(0),
        XmlTimes::Seconds => {
            let seconds = raw.trim().parse::<f64>().unwrap_or(0.0).max(0.0);
            (seconds * 1000.0).round() as u64
        }
    };
    Ok(value)
}

#[derive(Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: Option<u64>,
    #[serde(default)]
    d_duration_ms: Option<u64>,
    #[serde(default)]
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

fn parse_json3_events(payload: &str) -> Result<Vec<TranscriptLine>> {
    let parsed: Json3Payload = serde_json::from_str(payload)
        .map_err(|e| ResymeError::Parse(format!("json3 payload: {e}")))?;

    let lines = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text = clean_caption_text(
                &segs
                    .iter()
                    .map(|s| s.utf8.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            if text.is_empty() {
                return None;
            }
            Some(TranscriptLine {
                text,
                offset_ms: event.t_start_ms.unwrap_or(0),
                duration_ms: event.d_duration_ms.unwrap_or(0),
            })
        })
        .collect();

    Ok(lines)
}

/// Parse the JSON returned by the internal `get_transcript` endpoint.
///
/// Segments sit deep inside an engagement-panel structure whose exact
/// nesting keeps shifting, so they are collected by key rather than by path.
pub fn parse_transcript_panel(value: &serde_json::Value) -> Result<Vec<TranscriptLine>> {
    if value.get("actions").is_none() {
        return Err(ResymeError::Parse(
            "unrecognized transcript panel response".to_string(),
        ));
    }

    let mut lines = Vec::new();
    collect_segments(value, &mut lines);
    if lines.is_empty() {
        return Err(ResymeError::EmptyCaptions);
    }
    lines.sort_by_key(|l| l.offset_ms);
    Ok(lines)
}

fn collect_segments(value: &serde_json::Value, out: &mut Vec<TranscriptLine>) {
    if let Some(segment) = value.get("transcriptSegmentRenderer") {
        if let Some(line) = segment_line(segment) {
            out.push(line);
        }
    }
    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                collect_segments(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for nested in map.values() {
                collect_segments(nested, out);
            }
        }
        _ => {}
    }
}

fn segment_line(segment: &serde_json::Value) -> Option<TranscriptLine> {
    let start = ms_field(segment, "startMs")?;
    let end = ms_field(segment, "endMs").unwrap_or(start);

    let runs = segment.pointer("/snippet/runs").and_then(|r| r.as_array());
    let raw = match runs {
        Some(runs) => runs
            .iter()
            .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join(" "),
        None => segment
            .pointer("/snippet/simpleText")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string(),
    };

    let text = clean_caption_text(&raw);
    if text.is_empty() {
        return None;
    }
    Some(TranscriptLine {
        text,
        offset_ms: start,
        duration_ms: end.saturating_sub(start),
    })
}

/// Millisecond fields arrive as strings or numbers depending on the client.
fn ms_field(value: &serde_json::Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid regex"))
}

/// Strip inner markup, then decode HTML entities, then collapse whitespace.
/// Idempotent on already-clean text.
pub fn clean_caption_text(raw: &str) -> String {
    let stripped = tag_regex().replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn srv3_times_pass_through_unchanged() {
        let payload = r#"<?xml version="1.0" encoding="utf-8"?>
<timedtext format="3"><body>
<p t="1200" d="2400">Hello there</p>
<p t="3600" d="1800"><s>General</s><s> Kenobi</s></p>
</body></timedtext>"#;
        let lines = parse_caption_payload(payload).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].offset_ms, 1200);
        assert_eq!(lines[0].duration_ms, 2400);
        assert_eq!(lines[0].text, "Hello there");
        assert_eq!(lines[1].offset_ms, 3600);
        assert_eq!(lines[1].text, "General Kenobi");
    }

    #[test]
    fn legacy_times_are_converted_to_milliseconds() {
        let payload = r#"<transcript>
<text start="1.5" dur="2.25">First line</text>
<text start="12.645" dur="3">Second &amp; third</text>
</transcript>"#;
        let lines = parse_caption_payload(payload).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].offset_ms, 1500);
        assert_eq!(lines[0].duration_ms, 2250);
        assert_eq!(lines[1].offset_ms, 12645);
        assert_eq!(lines[1].duration_ms, 3000);
        assert_eq!(lines[1].text, "Second & third");
    }

    #[test]
    fn lines_are_sorted_by_offset() {
        let payload = r#"<transcript>
<text start="9" dur="1">later</text>
<text start="2" dur="1">earlier</text>
</transcript>"#;
        let lines = parse_caption_payload(payload).unwrap();
        assert_eq!(lines[0].text, "earlier");
        assert_eq!(lines[1].text, "later");
    }

    #[test]
    fn json3_events_schema() {
        let payload = r#"{"events":[
            {"tStartMs":0,"dDurationMs":5000,"segs":[{"utf8":"Never gonna"},{"utf8":"give you up"}]},
            {"tStartMs":5000,"dDurationMs":1000},
            {"tStartMs":6000,"dDurationMs":2000,"segs":[{"utf8":"  "}]}
        ]}"#;
        let lines = parse_caption_payload(payload).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Never gonna give you up");
        assert_eq!(lines[0].offset_ms, 0);
        assert_eq!(lines[0].duration_ms, 5000);
    }

    #[test]
    fn empty_payload_is_empty_captions_not_parse_failure() {
        assert!(matches!(
            parse_caption_payload(""),
            Err(ResymeError::EmptyCaptions)
        ));
        assert!(matches!(
            parse_caption_payload("<transcript></transcript>"),
            Err(ResymeError::EmptyCaptions)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        assert!(matches!(
            parse_caption_payload("{\"events\": [oops"),
            Err(ResymeError::Parse(_))
        ));
    }

    #[test]
    fn inner_markup_is_stripped_and_entities_decoded() {
        let payload = r#"<transcript>
<text start="0" dur="1">she said &quot;hi&quot; &#39;there&#39;</text>
</transcript>"#;
        let lines = parse_caption_payload(payload).unwrap();
        assert_eq!(lines[0].text, "she said \"hi\" 'there'");

        assert_eq!(clean_caption_text("a <i>word</i> here"), "a word here");
    }

    #[test]
    fn clean_is_idempotent_on_decoded_text() {
        for text in ["Tom & Jerry", "plain words", "a \"quoted\" line", "5 < 6 > 4"] {
            let once = clean_caption_text(text);
            let twice = clean_caption_text(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn transcript_panel_segments_are_collected() {
        let value = json!({
            "actions": [{
                "updateEngagementPanelAction": {
                    "content": {
                        "transcriptRenderer": {
                            "body": {
                                "transcriptBodyRenderer": {
                                    "cueGroups": [
                                        {"transcriptSegmentRenderer": {
                                            "startMs": "0",
                                            "endMs": "4000",
                                            "snippet": {"runs": [{"text": "first segment"}]}
                                        }},
                                        {"transcriptSegmentRenderer": {
                                            "startMs": "4000",
                                            "endMs": "7500",
                                            "snippet": {"runs": [{"text": "second segment"}]}
                                        }}
                                    ]
                                }
                            }
                        }
                    }
                }
            }]
        });
        let lines = parse_transcript_panel(&value).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first segment");
        assert_eq!(lines[1].offset_ms, 4000);
        assert_eq!(lines[1].duration_ms, 3500);
    }

    #[test]
    fn transcript_panel_without_actions_is_a_parse_failure() {
        assert!(matches!(
            parse_transcript_panel(&json!({"error": "gone"})),
            Err(ResymeError::Parse(_))
        ));
        assert!(matches!(
            parse_transcript_panel(&json!({"actions": []})),
            Err(ResymeError::EmptyCaptions)
        ));
    }

    #[test]
    fn caption_url_normalization() {
        assert_eq!(
            normalize_caption_url(
                "https://www.youtube.com/api/timedtext?v=x\\u0026lang=en",
                "https://www.youtube.com"
            ),
            "https://www.youtube.com/api/timedtext?v=x&lang=en"
        );
        assert_eq!(
            normalize_caption_url("/api/timedtext?v=x", "http://127.0.0.1:9000"),
            "http://127.0.0.1:9000/api/timedtext?v=x"
        );
    }

    #[test]
    fn format_parameter_is_not_duplicated() {
        assert_eq!(
            with_format("https://h/api/timedtext?v=x", "srv3"),
            "https://h/api/timedtext?v=x&fmt=srv3"
        );
        assert_eq!(
            with_format("https://h/api/timedtext?v=x&fmt=json3", "srv3"),
            "https://h/api/timedtext?v=x&fmt=json3"
        );
        assert_eq!(with_format("https://h/api/timedtext", "srv3"), "https://h/api/timedtext?fmt=srv3");
    }
}
