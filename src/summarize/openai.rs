//! OpenAI chat-completion summarizer.

use super::Summarizer;
use crate::error::{Result, ResymeError};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;

/// Default timeout for model requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Summarizer backed by the OpenAI API or any API-compatible endpoint.
///
/// The API key is read from the `OPENAI_API_KEY` environment variable.
pub struct OpenAiSummarizer {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(model: &str, api_base: Option<&str>) -> Self {
        let mut config = OpenAIConfig::default();
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        // A long timeout prevents hung API calls without cutting off slow models.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Client::with_config(config).with_http_client(http_client),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt.to_string())
                .build()
                .map_err(|e| ResymeError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt.to_string())
                .build()
                .map_err(|e| ResymeError::Summarization(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| ResymeError::Summarization(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ResymeError::Summarization(format!("Failed to generate summary: {e}")))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .ok_or_else(|| ResymeError::Summarization("Empty response from model".to_string()))
    }
}
