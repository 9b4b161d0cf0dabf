//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default file name for a generated deck.
pub const DEFAULT_OUTPUT: &str = "SlideGenius_Output.pptx";

/// Turn text into slide outlines and outlines into PowerPoint decks
#[derive(Debug, Parser)]
#[command(name = "slidegen", version, about)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the outline for a text as JSON
    Outline {
        /// Text file to outline
        #[arg(long)]
        text: PathBuf,

        #[command(flatten)]
        request: ProviderArgs,
    },

    /// Render a deck from a text (or a prepared outline) and a template
    Generate {
        /// Text file to outline
        #[arg(long, required_unless_present = "outline")]
        text: Option<PathBuf>,

        /// Template presentation (.pptx or .potx)
        #[arg(short, long)]
        template: PathBuf,

        /// Where to write the deck
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Use this outline JSON instead of deriving one from --text
        #[arg(long, conflicts_with = "text")]
        outline: Option<PathBuf>,

        #[command(flatten)]
        request: ProviderArgs,
    },
}

/// How to ask for an outline.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProviderArgs {
    /// Free-form guidance such as tone or audience
    #[arg(short, long)]
    pub guidance: Option<String>,

    /// Outline provider id; defaults to the configured provider
    #[arg(short, long)]
    pub provider: Option<String>,

    /// API key; defaults to the environment variable named in the config
    #[arg(long)]
    pub api_key: Option<String>,
}
