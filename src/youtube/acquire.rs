//! Acquisition pipeline: ordered strategies, retry budget, fallback states.
//!
//! One request walks a fixed strategy ladder (Android player, watch page,
//! internal transcript panel) and short-circuits on the first strategy that
//! produces caption lines. Playability failures stop the ladder immediately;
//! exhausting it without lines is not an error but the NoCaptions terminal
//! state, a [`Transcript`] with empty `lines`, so the caller can fall back
//! to metadata-based summarization.

use crate::error::{Result, ResymeError};
use crate::youtube::captions;
use crate::youtube::client::{
    extract_ytcfg_value, player_response_from_watch_page, ClientProfile, InnerTubeClient,
    InnerTubeConfig, PlayerResponse,
};
use crate::youtube::metadata::{self, UNKNOWN_FIELD};
use crate::youtube::params::transcript_params_variants;
use crate::youtube::tracks::{resolve_caption_track, CaptionTrack, TrackMatch};
use crate::youtube::url::parse_video_id;
use crate::youtube::{Transcript, TranscriptLine, VideoMetadata, VideoRef};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Progress notifications emitted while a request is in flight.
///
/// A pure side channel for the host UI; dropping the sink changes nothing
/// about the result.
#[derive(Debug, Clone)]
pub enum AcquisitionEvent {
    StrategyStarted {
        strategy: &'static str,
    },
    StrategyFailed {
        strategy: &'static str,
        reason: String,
    },
    /// The caption payload came back empty; the same URL is being refetched.
    RetryingEmptyPayload {
        attempt: u32,
    },
    /// No track matched the requested language; another one was selected.
    LanguageFallback {
        requested: String,
        selected: String,
    },
    NoCaptions,
}

/// Callback receiving [`AcquisitionEvent`]s.
pub type EventSink = Box<dyn Fn(AcquisitionEvent) + Send + Sync>;

/// Default number of fetch attempts for transient empty caption payloads.
pub const DEFAULT_EMPTY_RETRIES: u32 = 3;

/// Pause inserted once transport errors repeat, to avoid hammering the host.
const NETWORK_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Outcome of one (strategy, parameters) attempt. Diagnostics only; never
/// persisted or shared across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptOutcome {
    EmptyResult,
    HttpError,
    ParseError,
}

#[derive(Debug)]
struct AcquisitionAttempt {
    strategy: &'static str,
    outcome: AttemptOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    AndroidPlayer,
    WatchPage,
    TranscriptPanel,
}

impl Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::AndroidPlayer => "android-player",
            Strategy::WatchPage => "watch-page",
            Strategy::TranscriptPanel => "transcript-panel",
        }
    }
}

/// The ladder, most reliable first. The Android player endpoint sees fewer
/// anti-scraping checks; the watch page doubles as a metadata source; the
/// transcript panel is a last resort with its own parameter encodings.
const STRATEGIES: [Strategy; 3] = [
    Strategy::AndroidPlayer,
    Strategy::WatchPage,
    Strategy::TranscriptPanel,
];

/// Fields gathered along the way so a later strategy (or the NoCaptions
/// state) can reuse what an earlier one already fetched.
#[derive(Default)]
struct StrategyContext {
    title: Option<String>,
    author: Option<String>,
    channel_url: Option<String>,
    visitor_data: Option<String>,
    tracks: Vec<CaptionTrack>,
}

impl StrategyContext {
    fn absorb_player(&mut self, player: &PlayerResponse) {
        if let Some(details) = &player.video_details {
            if self.title.is_none() && !details.title.trim().is_empty() {
                self.title = Some(metadata::decode_entities(&details.title));
            }
            if self.author.is_none() && !details.author.trim().is_empty() {
                self.author = Some(metadata::decode_entities(&details.author));
            }
            if self.channel_url.is_none() && !details.channel_id.is_empty() {
                self.channel_url = Some(format!(
                    "https://www.youtube.com/channel/{}",
                    details.channel_id
                ));
            }
        }
        if self.tracks.is_empty() {
            self.tracks = player.caption_tracks().to_vec();
        }
    }

    fn into_transcript(self, video: VideoRef, lines: Vec<TranscriptLine>) -> Transcript {
        Transcript {
            video,
            title: self.title.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            author: self.author.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            channel_url: self.channel_url.unwrap_or_default(),
            lines,
        }
    }
}

/// Coordinates transcript and metadata acquisition for single requests.
///
/// Holds no per-request state; each call builds everything fresh, and
/// network calls within a request are strictly sequential.
pub struct AcquisitionPipeline {
    client: InnerTubeClient,
    events: Option<EventSink>,
    empty_retries: u32,
}

impl AcquisitionPipeline {
    pub fn new(config: InnerTubeConfig) -> Result<Self> {
        Ok(Self {
            client: InnerTubeClient::new(config)?,
            events: None,
            empty_retries: DEFAULT_EMPTY_RETRIES,
        })
    }

    /// Attach a progress event sink.
    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Override the refetch budget for transient empty caption payloads.
    pub fn with_empty_retries(mut self, retries: u32) -> Self {
        self.empty_retries = retries.max(1);
        self
    }

    fn emit(&self, event: AcquisitionEvent) {
        if let Some(sink) = &self.events {
            sink(event);
        }
    }

    /// Fetch a transcript for `url`, preferring captions in `language`.
    ///
    /// Never fails just because a video has no captions: that case returns
    /// a transcript with empty `lines`. Errors are reserved for invalid
    /// input, unavailable videos, and exhausted transport failures.
    pub async fn fetch_transcript(&self, url: &str, language: &str) -> Result<Transcript> {
        let video = parse_video_id(url)?;
        let mut context = StrategyContext::default();
        let mut attempts: Vec<AcquisitionAttempt> = Vec::new();
        let mut consecutive_network_errors = 0u32;

        for strategy in STRATEGIES {
            self.emit(AcquisitionEvent::StrategyStarted {
                strategy: strategy.name(),
            });

            match self
                .run_strategy(strategy, &video, language, &mut context)
                .await
            {
                Ok(lines) => {
                    info!(
                        "Acquired {} caption lines for {} via {}",
                        lines.len(),
                        video.video_id,
                        strategy.name()
                    );
                    return Ok(context.into_transcript(video, lines));
                }
                Err(error) if error.is_terminal() => return Err(error),
                Err(error) => {
                    let outcome = match &error {
                        ResymeError::EmptyCaptions => AttemptOutcome::EmptyResult,
                        ResymeError::Http(_) => AttemptOutcome::HttpError,
                        _ => AttemptOutcome::ParseError,
                    };
                    if error.is_network() {
                        consecutive_network_errors += 1;
                        if consecutive_network_errors >= 2 {
                            tokio::time::sleep(NETWORK_RETRY_DELAY).await;
                        }
                    } else {
                        consecutive_network_errors = 0;
                    }
                    debug!("Strategy {} failed: {}", strategy.name(), error);
                    self.emit(AcquisitionEvent::StrategyFailed {
                        strategy: strategy.name(),
                        reason: error.to_string(),
                    });
                    attempts.push(AcquisitionAttempt {
                        strategy: strategy.name(),
                        outcome,
                    });
                }
            }
        }

        debug!("All strategies exhausted for {}", video.video_id);
        for attempt in &attempts {
            debug!("  {} -> {:?}", attempt.strategy, attempt.outcome);
        }
        self.emit(AcquisitionEvent::NoCaptions);
        Ok(context.into_transcript(video, Vec::new()))
    }

    /// Fetch metadata for `url`, independent of caption availability.
    pub async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        let video = parse_video_id(url)?;

        match self
            .client
            .fetch_player(&video.video_id, ClientProfile::Android)
            .await
        {
            Ok(player) => {
                player.check_playability()?;
                Ok(metadata::from_player_response(&video, &player))
            }
            Err(error) if error.is_terminal() => Err(error),
            Err(error) => {
                debug!("Player metadata fetch failed ({error}); trying watch page");
                let html = self.client.fetch_watch_page(&video.video_id).await?;
                metadata::from_watch_page(&video, &html).ok_or_else(|| {
                    ResymeError::Parse("no recognizable metadata in watch page".to_string())
                })
            }
        }
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        video: &VideoRef,
        language: &str,
        context: &mut StrategyContext,
    ) -> Result<Vec<TranscriptLine>> {
        match strategy {
            Strategy::AndroidPlayer => {
                let player = self
                    .client
                    .fetch_player(&video.video_id, ClientProfile::Android)
                    .await?;
                player.check_playability()?;
                context.absorb_player(&player);
                self.lines_from_tracks(player.caption_tracks(), language)
                    .await
            }
            Strategy::WatchPage => {
                let html = self.client.fetch_watch_page(&video.video_id).await?;
                if context.visitor_data.is_none() {
                    context.visitor_data = extract_ytcfg_value(&html, "VISITOR_DATA");
                }
                let player = player_response_from_watch_page(&html)?;
                player.check_playability()?;
                context.absorb_player(&player);
                self.lines_from_tracks(player.caption_tracks(), language)
                    .await
            }
            Strategy::TranscriptPanel => {
                let variants =
                    transcript_params_variants(&video.video_id, language, &context.tracks);
                let mut last = ResymeError::EmptyCaptions;
                for params in variants {
                    let result = self
                        .client
                        .fetch_transcript_panel(&params, context.visitor_data.as_deref())
                        .await
                        .and_then(|value| captions::parse_transcript_panel(&value));
                    match result {
                        Ok(lines) => return Ok(lines),
                        Err(error) if error.is_terminal() => return Err(error),
                        Err(error) => last = error,
                    }
                }
                Err(last)
            }
        }
    }

    /// Resolve a track and fetch its payload, refetching a bounded number of
    /// times when the payload comes back empty (a known transient mode).
    async fn lines_from_tracks(
        &self,
        tracks: &[CaptionTrack],
        language: &str,
    ) -> Result<Vec<TranscriptLine>> {
        let Some((track, matched)) = resolve_caption_track(tracks, language) else {
            return Err(ResymeError::EmptyCaptions);
        };

        if matched == TrackMatch::Fallback {
            warn!(
                "No '{}' captions; falling back to '{}'",
                language, track.language_code
            );
            self.emit(AcquisitionEvent::LanguageFallback {
                requested: language.to_string(),
                selected: track.language_code.clone(),
            });
        }

        for attempt in 1..=self.empty_retries {
            match captions::fetch_and_parse(&self.client, track).await {
                Ok(lines) => return Ok(lines),
                Err(ResymeError::EmptyCaptions) if attempt < self.empty_retries => {
                    self.emit(AcquisitionEvent::RetryingEmptyPayload { attempt });
                    debug!(
                        "Empty caption payload for '{}' (attempt {attempt}); refetching",
                        track.language_code
                    );
                }
                Err(error) => return Err(error),
            }
        }
        Err(ResymeError::EmptyCaptions)
    }
}
