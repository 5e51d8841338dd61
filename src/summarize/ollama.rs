//! Local Ollama summarizer.

use super::Summarizer;
use crate::error::{Result, ResymeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Default timeout for local model requests (10 minutes; local inference is
/// slow on modest hardware).
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Summarizer backed by a local Ollama server.
pub struct OllamaSummarizer {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaSummarizer {
    pub fn new(model: &str, base_url: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint_chat(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint_chat())
            .json(&request)
            .send()
            .await
            .map_err(|e| ResymeError::Summarization(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResymeError::Summarization(format!(
                "ollama chat HTTP {status}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ResymeError::Summarization(e.to_string()))?;
        Ok(parsed.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_endpoint_has_no_double_slash() {
        let s = OllamaSummarizer::new("llama3", Some("http://localhost:11434/"));
        assert_eq!(s.endpoint_chat(), "http://localhost:11434/api/chat");
    }
}
