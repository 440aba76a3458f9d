//! End-to-end pipeline runs against mock backends and a stub renderer.

mod test_utils;

use std::path::Path;
use std::sync::Arc;

use quizreel_core::{
    AssetConfig, GenerationConfig, QuizreelConfig, RenderConfig, SelectionConfig, StorageBackend,
    StorageConfig, SubtitleConfig, TimingConfig, TtsConfig, VideoConfig, VoiceConfig,
};
use quizreel_error::QuizreelErrorKind;
use quizreel_pipeline::{
    CancelToken, NarrationSynthesizer, QuestionGenerator, QuizPipeline, RunOutcome,
    SelectionHistory,
};
use quizreel_storage::artifact_store_from_config;
use quizreel_video::VideoAssembler;
use tempfile::TempDir;
use test_utils::{MockQuestionBackend, MockSpeechBackend, StubRenderer, quiz_json};

fn config(dir: &Path, max_duration_secs: f64) -> QuizreelConfig {
    let touch = |p: &Path| {
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(p, b"stub").unwrap();
    };
    let assets = AssetConfig {
        backgrounds_dir: dir.join("backgrounds"),
        default_background: dir.join("backgrounds/default.mp4"),
        music: dir.join("music/bed.mp3"),
        countdown_tick: dir.join("sounds/tick.wav"),
    };
    touch(&assets.default_background);
    touch(&assets.music);

    QuizreelConfig {
        video: VideoConfig {
            width: 1080,
            height: 1920,
            fps: 30,
            max_duration_secs,
            min_duration_secs: 0.0,
        },
        selection: SelectionConfig {
            themes: vec!["history".into()],
            weights: Default::default(),
            exclude_recent: 0,
            history_path: dir.join("history.json"),
        },
        generation: GenerationConfig {
            provider: "gemini".into(),
            model: "test-model".into(),
            questions_per_video: 3,
            max_retries: 2,
            backoff_ms: 1,
            timeout_secs: 5,
            temperature: 0.7,
            max_tokens: 2000,
        },
        tts: TtsConfig {
            provider: "google".into(),
            voice: VoiceConfig::default(),
            read_choices_aloud: false,
            max_concurrency: 4,
            max_retries: 0,
            timeout_secs: 5,
        },
        timing: TimingConfig {
            segment_pause_secs: 0.5,
            countdown_secs: 0.0,
        },
        assets,
        subtitles: SubtitleConfig {
            enabled: true,
            word_by_word: false,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            local_path: dir.join("output"),
            remote: None,
        },
        render: RenderConfig {
            max_retries: 1,
            timeout_secs: 30,
            music_volume: 0.1,
        },
    }
}

/// Speech backend with the durations from the end-to-end scenario:
/// three questions, segments [3.0, 1.5, 2.0, 1.5, 2.5, 1.5] seconds.
fn scenario_speech() -> MockSpeechBackend {
    MockSpeechBackend::new()
        .with_duration("Question 1?", 3.0)
        .with_duration("The answer is: Beta 1", 1.5)
        .with_duration("Question 2?", 2.0)
        .with_duration("The answer is: Beta 2", 1.5)
        .with_duration("Question 3?", 2.5)
        .with_duration("The answer is: Beta 3", 1.5)
}

fn pipeline(
    config: QuizreelConfig,
    questions: MockQuestionBackend,
    speech: MockSpeechBackend,
) -> QuizPipeline<StubRenderer> {
    let generator = QuestionGenerator::new(Box::new(questions), config.generation.clone());
    let synthesizer = NarrationSynthesizer::new(Arc::new(speech), config.tts.clone());
    let assembler = VideoAssembler::with_renderer(&config, StubRenderer);
    let store = artifact_store_from_config(&config.storage).unwrap();
    QuizPipeline::new(config, generator, synthesizer, assembler, store)
}

#[tokio::test]
async fn full_run_within_maximum_stores_artifact() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = config(dir.path(), 15.0);
    let output_dir = config.storage.local_path.clone();
    let pipeline = pipeline(
        config,
        MockQuestionBackend::new_success(quiz_json(3)),
        scenario_speech(),
    );

    let mut history = SelectionHistory::new();
    let outcome = pipeline.run(&mut history, &CancelToken::new()).await?;

    let RunOutcome::Completed(receipt) = outcome else {
        panic!("expected completed run");
    };
    assert_eq!(receipt.backend, "filesystem");
    assert!(Path::new(&receipt.location).exists());
    assert_eq!(std::fs::read(&receipt.location)?, b"rendered");

    // Exactly one video in the output directory
    assert_eq!(std::fs::read_dir(&output_dir)?.count(), 1);

    // The topic was recorded for repeat avoidance
    assert_eq!(history.last_used(1), vec!["history"]);
    Ok(())
}

#[tokio::test]
async fn timeline_total_is_audio_plus_pauses() -> anyhow::Result<()> {
    // 12.0s of narration + 5 pauses of 0.5s = 14.5s, inside the 15s cap
    let dir = TempDir::new()?;
    let pipeline = pipeline(
        config(dir.path(), 15.0),
        MockQuestionBackend::new_success(quiz_json(3)),
        scenario_speech(),
    );

    let mut history = SelectionHistory::new();
    let artifact = pipeline
        .render(&mut history, &CancelToken::new())
        .await?
        .expect("not cancelled");

    assert!((artifact.duration_secs - 14.5).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn tight_maximum_truncates_trailing_segments() -> anyhow::Result<()> {
    // Same scenario with a 10s cap: the last two segments are dropped,
    // leaving 8.0s of audio + 3 pauses = 9.5s
    let dir = TempDir::new()?;
    let pipeline = pipeline(
        config(dir.path(), 10.0),
        MockQuestionBackend::new_success(quiz_json(3)),
        scenario_speech(),
    );

    let mut history = SelectionHistory::new();
    let artifact = pipeline
        .render(&mut history, &CancelToken::new())
        .await?
        .expect("not cancelled");

    assert!((artifact.duration_secs - 9.5).abs() < 1e-9);
    assert!(artifact.duration_secs <= 10.0);
    Ok(())
}

#[tokio::test]
async fn synthesis_failure_aborts_run_and_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), 15.0);
    let output_dir = config.storage.local_path.clone();
    let pipeline = pipeline(
        config,
        MockQuestionBackend::new_success(quiz_json(3)),
        scenario_speech().with_permanent_failure("The answer is: Beta 1"),
    );

    let mut history = SelectionHistory::new();
    let err = pipeline
        .run(&mut history, &CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), QuizreelErrorKind::Synthesis(_)));
    assert_eq!(err.kind().stage(), "narration synthesis");

    // The store was never invoked: no file at any destination path
    let stored: Vec<_> = std::fs::read_dir(&output_dir)
        .map(|d| d.collect())
        .unwrap_or_default();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn cancellation_between_stages_persists_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = config(dir.path(), 15.0);
    let output_dir = config.storage.local_path.clone();
    let pipeline = pipeline(
        config,
        MockQuestionBackend::new_success(quiz_json(3)),
        scenario_speech(),
    );

    let cancel = CancelToken::new();
    cancel.cancel();

    let mut history = SelectionHistory::new();
    let outcome = pipeline.run(&mut history, &cancel).await?;

    assert!(matches!(outcome, RunOutcome::Cancelled));
    let stored: Vec<_> = std::fs::read_dir(&output_dir)
        .map(|d| d.collect())
        .unwrap_or_default();
    assert!(stored.is_empty());
    Ok(())
}

#[tokio::test]
async fn storage_can_be_retried_without_rerendering() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pipeline = pipeline(
        config(dir.path(), 15.0),
        MockQuestionBackend::new_success(quiz_json(3)),
        scenario_speech(),
    );

    let mut history = SelectionHistory::new();
    let artifact = pipeline
        .render(&mut history, &CancelToken::new())
        .await?
        .expect("not cancelled");

    // Two persists of one artifact land on the same deterministic key
    let first = pipeline.persist(&artifact).await?;
    let second = pipeline.persist(&artifact).await?;
    assert_eq!(first.location, second.location);
    Ok(())
}
