//! Prompt templates for Resyme.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for summary generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
    /// Template used when a transcript is available.
    pub user: String,
    /// Template used when only metadata is available.
    pub metadata_user: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: r###"You are a note-taking assistant that turns video transcripts into structured markdown summaries.

When summarizing a transcript:
1. Open with a 2-3 sentence overview of what the video covers
2. Follow with "## Key Points" - the substantive claims, arguments, or steps, as a bulleted list
3. Close with "## Takeaways" - what a viewer should remember or do next

Rules:
- Base everything strictly on the transcript; never invent content
- Ignore filler: subscription requests, intros like "welcome back", sponsor reads, outros
- Keep technical terms, names, and numbers exactly as spoken
- Write in the same language as the transcript"###
                .to_string(),

            user: r#"Summarize this video transcript.

Video title: {{title}}
Channel: {{author}}

Transcript:
{{transcript}}"#
                .to_string(),

            metadata_user: r#"This video has no captions, so only its metadata is available. Write a short, honest note describing what the video appears to be about. Make clear the note is based on metadata, not the video content.

Video title: {{title}}
Channel: {{author}}
Published: {{published}}
Tags: {{tags}}

Description:
{{description}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory
    /// and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load summary prompts if file exists
            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a template with the given variables plus the configured custom
    /// variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let rendered = Self::render(template, vars);
        Self::render(&rendered, &self.variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn render_replaces_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), "My Video".to_string());
        let rendered = Prompts::render("Title: {{title}}, again: {{title}}", &vars);
        assert_eq!(rendered, "Title: My Video, again: My Video");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let vars = HashMap::new();
        assert_eq!(Prompts::render("{{missing}}", &vars), "{{missing}}");
    }

    #[test]
    fn custom_variables_apply_after_request_variables() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("tone".to_string(), "concise".to_string());
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), "T".to_string());
        let rendered = prompts.render_with_custom("{{title}} in a {{tone}} style", &vars);
        assert_eq!(rendered, "T in a concise style");
    }
}
