//! Test utilities: mock backends and a stub renderer.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quizreel_core::{Topic, VoiceConfig};
use quizreel_error::{BackendError, BackendErrorKind, QuizreelResult};
use quizreel_interface::{QuestionBackend, SpeechBackend, SpokenAudio};
use quizreel_video::{CompositionPlan, Renderer};

/// One scripted response from a mock backend.
pub enum MockResponse {
    Success(String),
    Error(BackendErrorKind),
}

/// Question backend that replays a scripted response sequence.
///
/// Once the script is exhausted, the last response repeats.
pub struct MockQuestionBackend {
    script: Mutex<Vec<MockResponse>>,
    calls: AtomicUsize,
}

impl MockQuestionBackend {
    pub fn new_sequence(script: Vec<MockResponse>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn new_success(payload: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockResponse::Success(payload.into())])
    }

    /// Fails `failures` times with a transient 503, then succeeds.
    pub fn new_fail_then_succeed(failures: usize, payload: impl Into<String>) -> Self {
        let mut script = Vec::new();
        for _ in 0..failures {
            script.push(MockResponse::Error(BackendErrorKind::Http {
                status_code: 503,
                message: "service unavailable".to_string(),
            }));
        }
        script.push(MockResponse::Success(payload.into()));
        Self::new_sequence(script)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionBackend for MockQuestionBackend {
    async fn generate_questions(&self, _topic: &Topic, _count: usize) -> QuizreelResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap();
        let response = script.get(call).or_else(|| script.last());
        match response {
            Some(MockResponse::Success(payload)) => Ok(payload.clone()),
            Some(MockResponse::Error(kind)) => Err(BackendError::new(kind.clone()).into()),
            None => Ok(String::new()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock-questions"
    }
}

/// Speech backend with per-text durations, delays, and scripted failures.
pub struct MockSpeechBackend {
    durations: HashMap<String, f64>,
    delays: HashMap<String, Duration>,
    fail_texts: HashMap<String, BackendErrorKind>,
    calls: AtomicUsize,
    spoken: Mutex<Vec<String>>,
}

impl MockSpeechBackend {
    pub fn new() -> Self {
        Self {
            durations: HashMap::new(),
            delays: HashMap::new(),
            fail_texts: HashMap::new(),
            calls: AtomicUsize::new(0),
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn with_duration(mut self, text: impl Into<String>, secs: f64) -> Self {
        self.durations.insert(text.into(), secs);
        self
    }

    pub fn with_delay(mut self, text: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(text.into(), delay);
        self
    }

    /// Make synthesis of `text` fail permanently (HTTP 400).
    pub fn with_permanent_failure(mut self, text: impl Into<String>) -> Self {
        self.fail_texts.insert(
            text.into(),
            BackendErrorKind::Http {
                status_code: 400,
                message: "bad request".to_string(),
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Completion order of successful calls.
    pub fn spoken_order(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechBackend for MockSpeechBackend {
    async fn speak(&self, text: &str, _voice: &VoiceConfig) -> QuizreelResult<SpokenAudio> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(kind) = self.fail_texts.get(text) {
            return Err(BackendError::new(kind.clone()).into());
        }

        self.spoken.lock().unwrap().push(text.to_string());

        let duration_secs = self.durations.get(text).copied().unwrap_or(1.0);
        Ok(SpokenAudio {
            audio: format!("wav:{}", text).into_bytes(),
            duration_secs,
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock-speech"
    }
}

/// Arc wrapper so tests can keep a handle on a backend the generator owns.
pub struct SharedQuestions(pub Arc<MockQuestionBackend>);

#[async_trait]
impl QuestionBackend for SharedQuestions {
    async fn generate_questions(&self, topic: &Topic, count: usize) -> QuizreelResult<String> {
        self.0.generate_questions(topic, count).await
    }

    fn provider_name(&self) -> &'static str {
        self.0.provider_name()
    }
}

/// Renderer that returns a fixed payload without touching ffmpeg.
pub struct StubRenderer;

#[async_trait]
impl Renderer for StubRenderer {
    async fn render(&self, _plan: &CompositionPlan) -> QuizreelResult<Vec<u8>> {
        Ok(b"rendered".to_vec())
    }
}

/// A quiz response with `count` valid questions, as the generation backend
/// would return it.
pub fn quiz_json(count: usize) -> String {
    let questions: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"question": "Question {n}?", "choices": ["Alpha {n}", "Beta {n}", "Gamma {n}", "Delta {n}"], "answer": 1}}"#,
                n = i + 1
            )
        })
        .collect();
    format!(r#"{{"questions": [{}]}}"#, questions.join(","))
}
