//! Configuration settings for Resyme.

use crate::youtube::InnerTubeConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub summary: SummarySettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where notes are written when no output path is given.
    pub notes_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            notes_dir: "~/resyme".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Settings for the YouTube acquisition pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Preferred caption language.
    pub language: String,
    /// Fetch attempts for transient empty caption payloads.
    pub empty_retries: u32,
    /// Per-attempt request timeout in seconds.
    pub timeout_seconds: u64,
    /// Interface language sent to YouTube.
    pub hl: String,
    /// Geo region sent to YouTube.
    pub gl: String,
    /// Override the YouTube origin (proxies, tests).
    pub base_url: Option<String>,
    /// Override the public web-client API key if YouTube rotates it.
    pub api_key: Option<String>,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            empty_retries: 3,
            timeout_seconds: 12,
            hl: "en".to_string(),
            gl: "US".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

impl YoutubeSettings {
    /// Build the client configuration, applying any overrides.
    pub fn innertube_config(&self) -> InnerTubeConfig {
        let mut config = InnerTubeConfig {
            hl: self.hl.clone(),
            gl: self.gl.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            ..InnerTubeConfig::default()
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(api_key) = &self.api_key {
            config.web_api_key = api_key.clone();
        }
        config
    }
}

/// Summarization provider type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryProvider {
    /// OpenAI (or any API-compatible endpoint, default).
    #[default]
    OpenAi,
    /// Local Ollama server.
    Ollama,
}

impl std::str::FromStr for SummaryProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(SummaryProvider::OpenAi),
            "ollama" => Ok(SummaryProvider::Ollama),
            _ => Err(format!("Unknown summary provider: {s}")),
        }
    }
}

impl std::fmt::Display for SummaryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryProvider::OpenAi => write!(f, "openai"),
            SummaryProvider::Ollama => write!(f, "ollama"),
        }
    }
}

/// Summarization backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Summary provider (openai, ollama).
    pub provider: SummaryProvider,
    /// Model to use for summary generation.
    pub model: String,
    /// Override the provider's API base URL.
    pub base_url: Option<String>,
    /// Transcript text beyond this many characters is truncated before
    /// prompting.
    pub max_transcript_chars: usize,
    /// Append the timestamped transcript to the rendered note.
    pub include_transcript: bool,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            provider: SummaryProvider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            max_transcript_chars: 24_000,
            include_transcript: true,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ResymeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resyme")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded notes directory path.
    pub fn notes_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.notes_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let settings = Settings::default();
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let reparsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.youtube.language, "en");
        assert_eq!(reparsed.youtube.empty_retries, 3);
        assert_eq!(reparsed.summary.provider, SummaryProvider::OpenAi);
    }

    #[test]
    fn innertube_config_applies_overrides() {
        let youtube = YoutubeSettings {
            base_url: Some("http://127.0.0.1:8080/".to_string()),
            api_key: Some("test-key".to_string()),
            timeout_seconds: 5,
            ..YoutubeSettings::default()
        };
        let config = youtube.innertube_config();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.web_api_key, "test-key");
        assert_eq!(config.timeout, Duration::from_secs(5));
        // The fingerprint constants stay at their defaults.
        assert_eq!(config.android_client_version, InnerTubeConfig::default().android_client_version);
    }

    #[test]
    fn provider_parses_from_string() {
        assert_eq!(
            "openai".parse::<SummaryProvider>().unwrap(),
            SummaryProvider::OpenAi
        );
        assert_eq!(
            "Ollama".parse::<SummaryProvider>().unwrap(),
            SummaryProvider::Ollama
        );
        assert!("claude".parse::<SummaryProvider>().is_err());
        assert_eq!(SummaryProvider::Ollama.to_string(), "ollama");
    }
}
