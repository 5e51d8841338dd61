//! Prompt construction for the summarization backend.
//!
//! Turns an acquired transcript (or, when captions are unavailable, bare
//! metadata) into the single prompt string the model backend receives.

use crate::config::Prompts;
use crate::youtube::{Transcript, VideoMetadata};
use std::collections::HashMap;

/// Builds model prompts from configured templates.
pub struct PromptBuilder {
    prompts: Prompts,
    max_transcript_chars: usize,
}

impl PromptBuilder {
    pub fn new(prompts: Prompts, max_transcript_chars: usize) -> Self {
        Self {
            prompts,
            max_transcript_chars,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.prompts.summary.system
    }

    /// Prompt for a transcript-backed summary.
    pub fn transcript_prompt(&self, transcript: &Transcript) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), transcript.title.clone());
        vars.insert("author".to_string(), transcript.author.clone());
        vars.insert(
            "transcript".to_string(),
            truncate_chars(&transcript.plain_text(), self.max_transcript_chars),
        );
        self.prompts
            .render_with_custom(&self.prompts.summary.user, &vars)
    }

    /// Prompt when captions are unavailable and only metadata remains.
    pub fn metadata_prompt(&self, metadata: &VideoMetadata) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), metadata.title.clone());
        vars.insert("author".to_string(), metadata.author.clone());
        vars.insert(
            "published".to_string(),
            metadata
                .publish_date
                .map(|d| d.date_naive().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        );
        vars.insert("tags".to_string(), metadata.tags.join(", "));
        vars.insert(
            "description".to_string(),
            truncate_chars(&metadata.description, self.max_transcript_chars),
        );
        self.prompts
            .render_with_custom(&self.prompts.summary.metadata_user, &vars)
    }
}

/// Truncate on a character boundary without allocating when under the limit.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
