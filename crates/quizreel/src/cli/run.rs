//! Command handlers: pipeline wiring and batch execution.

use std::path::Path;
use std::sync::Arc;

use quizreel_core::QuizreelConfig;
use quizreel_models::{question_backend_from_config, speech_backend_from_config};
use quizreel_pipeline::{
    CancelToken, NarrationSynthesizer, QuestionGenerator, QuizPipeline, RunOutcome,
    SelectionHistory,
};
use quizreel_storage::artifact_store_from_config;
use quizreel_video::VideoAssembler;
use tracing::{error, info, warn};

fn load_config(path: Option<&Path>) -> Result<QuizreelConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => QuizreelConfig::from_file(path)?,
        None => QuizreelConfig::load()?,
    };
    Ok(config)
}

/// Generate `count` videos with one loaded configuration and a
/// single-writer selection history.
pub async fn run_generation(
    count: usize,
    config_path: Option<&Path>,
    theme: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    if let Some(theme) = theme {
        config.selection.themes = vec![theme.to_string()];
        config.selection.exclude_recent = 0;
    }

    let generator = QuestionGenerator::new(
        question_backend_from_config(&config.generation)?,
        config.generation.clone(),
    );
    let synthesizer = NarrationSynthesizer::new(
        Arc::from(speech_backend_from_config(&config.tts)?),
        config.tts.clone(),
    );
    let assembler = VideoAssembler::from_config(&config)?;
    let store = artifact_store_from_config(&config.storage)?;

    let history_path = config.selection.history_path.clone();
    let mut history = SelectionHistory::load(&history_path)?;

    let pipeline = QuizPipeline::new(config, generator, synthesizer, assembler, store);

    // Ctrl-C cancels between stages and aborts in-flight synthesis
    let cancel = CancelToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling after the current step");
            signal_cancel.cancel();
        }
    });

    for index in 1..=count {
        info!(video = index, of = count, "Starting pipeline run");

        match pipeline.run(&mut history, &cancel).await {
            Ok(RunOutcome::Completed(receipt)) => {
                info!(
                    location = %receipt.location,
                    backend = %receipt.backend,
                    "Video ready"
                );
            }
            Ok(RunOutcome::Cancelled) => {
                warn!("Run cancelled, stopping batch");
                break;
            }
            Err(e) => {
                error!(stage = e.kind().stage(), error = %e, "Run failed");
                history.save(&history_path)?;
                return Err(e.into());
            }
        }
    }

    history.save(&history_path)?;
    Ok(())
}

/// List configured themes and the recent selection history.
pub fn print_themes(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let history = SelectionHistory::load(&config.selection.history_path)?;
    let recent = history.last_used(config.selection.exclude_recent);

    println!("Themes ({}):", config.selection.themes.len());
    for theme in &config.selection.themes {
        let weight = config.selection.weights.get(theme).copied().unwrap_or(1.0);
        let slug = quizreel_core::Topic::new(theme.clone()).slug;
        let marker = if recent.contains(&slug.as_str()) {
            "  (recently used)"
        } else {
            ""
        };
        println!("  {} [weight {}]{}", theme, weight, marker);
    }
    Ok(())
}

/// Print the effective merged configuration as TOML.
pub fn print_config(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
