//! Best-effort metadata extraction from player and page payloads.
//!
//! Metadata absence must never abort a transcript fetch, so every field here
//! degrades to a placeholder instead of an error.

use crate::youtube::client::{extract_embedded_json, PlayerResponse};
use crate::youtube::{VideoMetadata, VideoRef};
use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder for fields the payload did not carry.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Decode HTML entities (named and numeric) in an extracted text field.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => decode_entities(v),
        None => UNKNOWN_FIELD.to_string(),
    }
}

/// Extract metadata from a structured player response.
pub fn from_player_response(video: &VideoRef, player: &PlayerResponse) -> VideoMetadata {
    let details = player.video_details.as_ref();
    let micro = player
        .microformat
        .as_ref()
        .and_then(|m| m.player_microformat_renderer.as_ref());

    let channel_url = micro
        .and_then(|m| m.owner_profile_url.clone())
        .or_else(|| {
            details
                .map(|d| d.channel_id.as_str())
                .filter(|id| !id.is_empty())
                .map(|id| format!("https://www.youtube.com/channel/{id}"))
        })
        .unwrap_or_default();

    VideoMetadata {
        video: video.clone(),
        title: or_unknown(details.map(|d| d.title.as_str())),
        description: details
            .map(|d| decode_entities(&d.short_description))
            .unwrap_or_default(),
        author: or_unknown(details.map(|d| d.author.as_str())),
        channel_url,
        tags: details
            .map(|d| d.keywords.iter().map(|k| decode_entities(k)).collect())
            .unwrap_or_default(),
        publish_date: micro
            .and_then(|m| m.publish_date.as_deref())
            .and_then(parse_publish_date),
    }
}

/// Extract metadata from watch-page HTML.
///
/// Prefers the embedded player response; falls back to the `ytInitialData`
/// page blob, whose renderer nesting shifts often enough that fields are
/// located by key instead of by path.
pub fn from_watch_page(video: &VideoRef, html: &str) -> Option<VideoMetadata> {
    if let Some(json) = extract_embedded_json(html, "ytInitialPlayerResponse") {
        if let Ok(player) = serde_json::from_str::<PlayerResponse>(json) {
            return Some(from_player_response(video, &player));
        }
    }

    let json = extract_embedded_json(html, "ytInitialData")?;
    let value: serde_json::Value = serde_json::from_str(json).ok()?;

    let title = find_by_key(&value, "videoPrimaryInfoRenderer")
        .and_then(|r| r.pointer("/title/runs/0/text"))
        .and_then(|t| t.as_str());

    let owner = find_by_key(&value, "videoOwnerRenderer");
    let author = owner
        .and_then(|o| o.pointer("/title/runs/0/text"))
        .and_then(|t| t.as_str());
    let channel_url = owner
        .and_then(|o| o.pointer("/navigationEndpoint/browseEndpoint/canonicalBaseUrl"))
        .and_then(|u| u.as_str())
        .map(|path| format!("https://www.youtube.com{path}"))
        .unwrap_or_default();

    Some(VideoMetadata {
        video: video.clone(),
        title: or_unknown(title),
        description: String::new(),
        author: or_unknown(author),
        channel_url,
        tags: Vec::new(),
        publish_date: None,
    })
}

/// Microformat publish dates have appeared both as bare dates and full
/// RFC 3339 timestamps.
fn parse_publish_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

fn find_by_key<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if let Some(found) = value.get(key) {
        return Some(found);
    }
    match value {
        serde_json::Value::Array(items) => items.iter().find_map(|v| find_by_key(v, key)),
        serde_json::Value::Object(map) => map.values().find_map(|v| find_by_key(v, key)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::url::parse_video_id;

    fn video() -> VideoRef {
        parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn player_response_fields_are_decoded() {
        let player: PlayerResponse = serde_json::from_str(
            r#"{
                "videoDetails": {
                    "videoId": "dQw4w9WgXcQ",
                    "title": "Cats &amp; Dogs",
                    "author": "Rick&#39;s Channel",
                    "channelId": "UCabc",
                    "shortDescription": "A &quot;classic&quot;",
                    "keywords": ["music", "80&#39;s"]
                },
                "microformat": {
                    "playerMicroformatRenderer": {
                        "publishDate": "2009-10-25"
                    }
                }
            }"#,
        )
        .unwrap();

        let metadata = from_player_response(&video(), &player);
        assert_eq!(metadata.title, "Cats & Dogs");
        assert_eq!(metadata.author, "Rick's Channel");
        assert_eq!(metadata.description, "A \"classic\"");
        assert_eq!(metadata.channel_url, "https://www.youtube.com/channel/UCabc");
        assert_eq!(metadata.tags, vec!["music".to_string(), "80's".to_string()]);
        assert_eq!(
            metadata.publish_date.unwrap().date_naive().to_string(),
            "2009-10-25"
        );
    }

    #[test]
    fn missing_fields_become_placeholders() {
        let player: PlayerResponse = serde_json::from_str("{}").unwrap();
        let metadata = from_player_response(&video(), &player);
        assert_eq!(metadata.title, UNKNOWN_FIELD);
        assert_eq!(metadata.author, UNKNOWN_FIELD);
        assert!(metadata.channel_url.is_empty());
        assert!(metadata.tags.is_empty());
        assert!(metadata.publish_date.is_none());
    }

    #[test]
    fn watch_page_falls_back_to_initial_data() {
        let html = r#"<script>var ytInitialData = {"contents":{"twoColumnWatchNextResults":{"results":{"results":{"contents":[
            {"videoPrimaryInfoRenderer":{"title":{"runs":[{"text":"Page Title"}]}}},
            {"videoSecondaryInfoRenderer":{"owner":{"videoOwnerRenderer":{
                "title":{"runs":[{"text":"Page Author"}]},
                "navigationEndpoint":{"browseEndpoint":{"canonicalBaseUrl":"/@pageauthor"}}
            }}}}
        ]}}}}};</script>"#;

        let metadata = from_watch_page(&video(), html).unwrap();
        assert_eq!(metadata.title, "Page Title");
        assert_eq!(metadata.author, "Page Author");
        assert_eq!(metadata.channel_url, "https://www.youtube.com/@pageauthor");
    }

    #[test]
    fn watch_page_prefers_player_response_blob() {
        let html = r#"<script>var ytInitialPlayerResponse = {"videoDetails":{"title":"Player Title","author":"A","channelId":"UCx"}};</script>"#;
        let metadata = from_watch_page(&video(), html).unwrap();
        assert_eq!(metadata.title, "Player Title");
    }

    #[test]
    fn publish_date_accepts_rfc3339() {
        let parsed = parse_publish_date("2019-09-12T19:00:00-07:00").unwrap();
        assert_eq!(parsed.date_naive().to_string(), "2019-09-13");
        assert!(parse_publish_date("not a date").is_none());
    }

    #[test]
    fn entity_decoding_is_idempotent() {
        let decoded = decode_entities("Tom &amp; Jerry");
        assert_eq!(decoded, "Tom & Jerry");
        assert_eq!(decode_entities(&decoded), decoded);
    }
}
