//! Question generation: backend retry, response normalization, validation.

use quizreel_core::{GenerationConfig, QuestionUnit, QuizSpec, Topic};
use quizreel_error::{
    GenerationError, QuizreelError, QuizreelErrorKind, QuizreelResult, RetryableError,
};
use quizreel_interface::QuestionBackend;
use serde::Deserialize;
use std::collections::HashSet;
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{instrument, warn};

/// Longest prompt the vertical layout can display legibly.
const MAX_PROMPT_CHARS: usize = 200;

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Tries two strategies in order: a ```json code block, then the first
/// balanced `{...}` object (string escapes respected).
///
/// # Errors
///
/// Returns `GenerationError` when no JSON object is found.
///
/// # Examples
///
/// ```
/// use quizreel_pipeline::extract_json;
///
/// let response = "Sure, here it is: {\"questions\": []} hope that helps!";
/// assert_eq!(extract_json(response).unwrap(), "{\"questions\": []}");
/// ```
pub fn extract_json(response: &str) -> QuizreelResult<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }
    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    Err(GenerationError::new(format!(
        "No JSON found in response (length: {})",
        response.len()
    ))
    .into())
}

/// Extract content from a ```json markdown code block.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```json")?;
    let content_start = start + "```json".len();
    match response[content_start..].find("```") {
        Some(end) => Some(response[content_start..content_start + end].trim().to_string()),
        // No closing fence: likely a truncated response, take the rest
        None => Some(response[content_start..].trim().to_string()),
    }
}

/// Extract content between balanced delimiters, honoring string escapes.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Debug, Deserialize)]
struct RawQuiz {
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    choices: Vec<String>,
    answer: usize,
}

/// Produces a validated [`QuizSpec`] from a topic via the configured
/// content-generation backend.
///
/// The backend call is retried up to the configured budget on transient
/// failures; a response that parses but fails validation is a
/// `GenerationError` and is never retried here.
pub struct QuestionGenerator {
    backend: Box<dyn QuestionBackend>,
    config: GenerationConfig,
}

impl QuestionGenerator {
    /// Create a generator around a backend.
    pub fn new(backend: Box<dyn QuestionBackend>, config: GenerationConfig) -> Self {
        Self { backend, config }
    }

    /// Generate a quiz for a topic.
    ///
    /// # Errors
    ///
    /// `BackendError` once the transient-retry budget is exhausted;
    /// `GenerationError` when the backend's content cannot be normalized
    /// into a valid quiz.
    #[instrument(skip(self), fields(topic = %topic.slug, count = self.config.questions_per_video))]
    pub async fn generate(&self, topic: &Topic) -> QuizreelResult<QuizSpec> {
        let count = self.config.questions_per_video;

        let strategy = ExponentialBackoff::from_millis(self.config.backoff_ms)
            .factor(2)
            .max_delay(std::time::Duration::from_secs(60))
            .map(jitter)
            .take(self.config.max_retries);

        let backend = self.backend.as_ref();
        let raw = Retry::spawn(strategy, move || async move {
            backend
                .generate_questions(topic, count)
                .await
                .map_err(classify_for_retry)
        })
        .await?;

        self.normalize(&raw, count)
    }

    /// Parse and validate the backend's raw response.
    fn normalize(&self, raw: &str, count: usize) -> QuizreelResult<QuizSpec> {
        let json = extract_json(raw)?;
        let parsed: RawQuiz = serde_json::from_str(&json).map_err(|e| {
            let preview: String = json.chars().take(100).collect();
            GenerationError::new(format!("Failed to parse quiz JSON: {} ({}...)", e, preview))
        })?;

        let mut units = Vec::new();
        for (index, question) in parsed.questions.into_iter().enumerate() {
            match validate_unit(question) {
                Ok(unit) => units.push(unit),
                Err(reason) => {
                    warn!(index, reason, "Dropping invalid question");
                }
            }
            if units.len() == count {
                break;
            }
        }

        if units.is_empty() {
            return Err(
                GenerationError::new("No questions survived validation").into(),
            );
        }

        Ok(QuizSpec { units })
    }
}

/// Check one raw question against the quiz invariants.
///
/// Duplicate choice text and an out-of-range answer index are treated as
/// malformed content, not repaired.
fn validate_unit(raw: RawQuestion) -> Result<QuestionUnit, &'static str> {
    let prompt = raw.question.trim().to_string();
    if prompt.is_empty() {
        return Err("empty prompt");
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err("prompt too long");
    }

    let choices: Vec<String> = raw.choices.iter().map(|c| c.trim().to_string()).collect();
    if choices.len() < 2 {
        return Err("fewer than two choices");
    }
    if choices.iter().any(|c| c.is_empty()) {
        return Err("empty choice text");
    }

    let mut seen = HashSet::new();
    if !choices.iter().all(|c| seen.insert(c.to_lowercase())) {
        return Err("duplicate choice text");
    }

    if raw.answer >= choices.len() {
        return Err("answer index out of range");
    }

    Ok(QuestionUnit {
        prompt,
        choices,
        correct_index: raw.answer,
        duration_hint_secs: None,
    })
}

/// Map a backend failure into the retry machinery: transient kinds retry,
/// everything else is permanent.
pub(crate) fn classify_for_retry(e: QuizreelError) -> RetryError<QuizreelError> {
    let transient = matches!(e.kind(), QuizreelErrorKind::Backend(b) if b.is_retryable());
    if transient {
        RetryError::Transient {
            err: e,
            retry_after: None,
        }
    } else {
        RetryError::Permanent(e)
    }
}
