//! Summarization backend abstraction.
//!
//! The acquisition core never talks to a model; it produces text that is
//! handed to one of the interchangeable providers behind [`Summarizer`].

mod ollama;
mod openai;

pub use ollama::OllamaSummarizer;
pub use openai::OpenAiSummarizer;

use crate::config::{SummaryProvider, SummarySettings};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for summary-generating model backends.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Generate a summary from a fully-built prompt pair.
    async fn summarize(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Build the configured provider.
pub fn create_summarizer(settings: &SummarySettings) -> Box<dyn Summarizer> {
    match settings.provider {
        SummaryProvider::OpenAi => Box::new(OpenAiSummarizer::new(
            &settings.model,
            settings.base_url.as_deref(),
        )),
        SummaryProvider::Ollama => Box::new(OllamaSummarizer::new(
            &settings.model,
            settings.base_url.as_deref(),
        )),
    }
}
