//! Configuration module for Resyme.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, SummaryPrompts};
pub use settings::{
    GeneralSettings, PromptSettings, Settings, SummaryProvider, SummarySettings, YoutubeSettings,
};
