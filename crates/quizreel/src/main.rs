//! Quizreel CLI binary.
//!
//! Command-line access to the video pipeline:
//! - Generate one or more quiz videos
//! - Inspect the configured themes and selection history
//! - Print the effective merged configuration

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_config, print_themes, run_generation};

    // API keys live in .env during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            count,
            config,
            theme,
        } => {
            run_generation(count, config.as_deref(), theme.as_deref()).await?;
        }

        Commands::Themes { config } => {
            print_themes(config.as_deref())?;
        }

        Commands::Config { config } => {
            print_config(config.as_deref())?;
        }
    }

    Ok(())
}
