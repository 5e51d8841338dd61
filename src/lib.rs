//! Resyme - YouTube Video Summarizer
//!
//! A local-first CLI tool that fetches a YouTube video's captions without
//! the official API and turns them into a structured markdown note through
//! a pluggable LLM backend.
//!
//! The name comes from the Norwegian word "resymé" for "summary."
//!
//! # Overview
//!
//! Resyme allows you to:
//! - Fetch transcripts straight from YouTube's internal player protocol
//! - Summarize videos into markdown notes with OpenAI or a local Ollama model
//! - Export raw transcripts as text, timestamped text, or JSON
//! - Inspect video metadata when captions are unavailable
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `youtube` - Transcript and metadata acquisition (the core)
//! - `prompt` - Prompt construction from transcripts or metadata
//! - `summarize` - Summarization backend abstraction
//! - `note` - Markdown note rendering and transcript export
//!
//! # Example
//!
//! ```rust,no_run
//! use resyme::youtube;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transcript =
//!         youtube::fetch_transcript("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "en").await?;
//!
//!     if transcript.has_captions() {
//!         println!("{}", transcript.plain_text());
//!     } else {
//!         // A valid state, not an error: fall back to metadata.
//!         let metadata = youtube::fetch_video_metadata(&transcript.video.source_url).await?;
//!         println!("{}: {}", metadata.title, metadata.description);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod note;
pub mod prompt;
pub mod summarize;
pub mod youtube;

pub use error::{Result, ResymeError};
