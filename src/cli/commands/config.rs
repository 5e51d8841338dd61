//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            apply_setting(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

fn apply_setting(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.notes_dir" => settings.general.notes_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "youtube.language" => settings.youtube.language = value.to_string(),
        "youtube.empty_retries" => settings.youtube.empty_retries = value.parse()?,
        "youtube.timeout_seconds" => settings.youtube.timeout_seconds = value.parse()?,
        "youtube.hl" => settings.youtube.hl = value.to_string(),
        "youtube.gl" => settings.youtube.gl = value.to_string(),
        "summary.provider" => {
            settings.summary.provider = value.parse().map_err(|e: String| anyhow::anyhow!(e))?
        }
        "summary.model" => settings.summary.model = value.to_string(),
        "summary.base_url" => settings.summary.base_url = Some(value.to_string()),
        "summary.include_transcript" => settings.summary.include_transcript = value.parse()?,
        _ => anyhow::bail!("Unknown or unsupported config key: {key}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummaryProvider;

    #[test]
    fn apply_setting_updates_known_keys() {
        let mut settings = Settings::default();
        apply_setting(&mut settings, "youtube.language", "de").unwrap();
        apply_setting(&mut settings, "summary.provider", "ollama").unwrap();
        assert_eq!(settings.youtube.language, "de");
        assert_eq!(settings.summary.provider, SummaryProvider::Ollama);
    }

    #[test]
    fn apply_setting_rejects_unknown_keys() {
        let mut settings = Settings::default();
        assert!(apply_setting(&mut settings, "nope.nope", "x").is_err());
        assert!(apply_setting(&mut settings, "youtube.empty_retries", "abc").is_err());
    }
}
