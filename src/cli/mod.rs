//! CLI module for Resyme.

pub mod commands;
mod guard;
mod output;

pub use guard::ProcessingSlot;
pub use output::Output;

use clap::{Parser, Subcommand};

/// Resyme - YouTube Video Summarizer
///
/// A local-first CLI tool that fetches a video's captions without the
/// official API and turns them into a structured markdown note.
/// The name comes from the Norwegian word "resymé" for "summary."
#[derive(Parser, Debug)]
#[command(name = "resyme")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch captions and write an AI-generated summary note
    Summarize {
        /// YouTube URL or bare video ID
        input: String,

        /// Write the note to this file instead of the notes directory
        #[arg(short, long)]
        output: Option<String>,

        /// Preferred caption language (overrides config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Model to use for summary generation (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Print the note to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Leave the timestamped transcript out of the note
        #[arg(long)]
        no_transcript: bool,
    },

    /// Fetch captions and print or export them without summarizing
    Transcript {
        /// YouTube URL or bare video ID
        input: String,

        /// Preferred caption language (overrides config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (text, timestamps, json)
        #[arg(long, default_value = "timestamps")]
        format: String,
    },

    /// Show title, channel, tags and other metadata for a video
    Metadata {
        /// YouTube URL or bare video ID
        input: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "summary.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
