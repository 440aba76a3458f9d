//! clap command-line structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Automated short-form quiz video generation.
#[derive(Parser)]
#[command(name = "quizreel", version, about)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate quiz videos
    Run {
        /// How many videos to generate in this batch
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Configuration file (merged over bundled defaults)
        #[arg(short = 'f', long)]
        config: Option<PathBuf>,

        /// Force a specific theme instead of selecting one
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// List configured themes and the recent selection history
    Themes {
        /// Configuration file (merged over bundled defaults)
        #[arg(short = 'f', long)]
        config: Option<PathBuf>,
    },

    /// Print the effective merged configuration
    Config {
        /// Configuration file (merged over bundled defaults)
        #[arg(short = 'f', long)]
        config: Option<PathBuf>,
    },
}
