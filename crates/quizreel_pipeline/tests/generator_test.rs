//! Question generator tests: retry classification and validation.

mod test_utils;

use quizreel_core::{GenerationConfig, Topic};
use quizreel_error::QuizreelErrorKind;
use quizreel_pipeline::QuestionGenerator;
use test_utils::{MockQuestionBackend, MockResponse, quiz_json};

fn config(max_retries: usize) -> GenerationConfig {
    GenerationConfig {
        provider: "gemini".into(),
        model: "test-model".into(),
        questions_per_video: 3,
        max_retries,
        backoff_ms: 1,
        timeout_secs: 5,
        temperature: 0.7,
        max_tokens: 2000,
    }
}

#[tokio::test]
async fn returns_validated_quiz_on_success() -> anyhow::Result<()> {
    let backend = MockQuestionBackend::new_success(quiz_json(3));
    let generator = QuestionGenerator::new(Box::new(backend), config(2));

    let quiz = generator.generate(&Topic::new("history")).await?;

    assert_eq!(quiz.len(), 3);
    assert_eq!(quiz.units[0].correct_index, 1);
    assert_eq!(quiz.units[0].choices.len(), 4);
    Ok(())
}

#[tokio::test]
async fn transient_failures_within_budget_succeed() -> anyhow::Result<()> {
    // Fails twice with 503, succeeds on the third attempt: within a retry
    // budget of 2
    let backend = MockQuestionBackend::new_fail_then_succeed(2, quiz_json(3));
    let generator = QuestionGenerator::new(Box::new(backend), config(2));

    let quiz = generator.generate(&Topic::new("history")).await?;
    assert_eq!(quiz.len(), 3);
    Ok(())
}

#[tokio::test]
async fn exhausted_retry_budget_is_backend_error() {
    // Same failure sequence with a budget of 1: attempts run out first
    let backend = MockQuestionBackend::new_fail_then_succeed(2, quiz_json(3));
    let generator = QuestionGenerator::new(Box::new(backend), config(1));

    let err = generator.generate(&Topic::new("history")).await.unwrap_err();
    assert!(matches!(err.kind(), QuizreelErrorKind::Backend(_)));
}

#[tokio::test]
async fn non_retryable_status_fails_immediately() {
    let backend = MockQuestionBackend::new_sequence(vec![MockResponse::Error(
        quizreel_error::BackendErrorKind::Http {
            status_code: 401,
            message: "unauthorized".into(),
        },
    )]);
    let generator = QuestionGenerator::new(Box::new(backend), config(3));

    let err = generator.generate(&Topic::new("history")).await.unwrap_err();
    assert!(matches!(err.kind(), QuizreelErrorKind::Backend(_)));
}

#[tokio::test]
async fn malformed_response_is_generation_error_without_retry() {
    let backend = std::sync::Arc::new(MockQuestionBackend::new_success(
        "I could not produce JSON, sorry!",
    ));
    let generator = QuestionGenerator::new(
        Box::new(test_utils::SharedQuestions(backend.clone())),
        config(3),
    );

    let err = generator.generate(&Topic::new("history")).await.unwrap_err();
    assert!(matches!(err.kind(), QuizreelErrorKind::Generation(_)));
    // Malformed content is not worth replaying: one backend call only
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn invalid_units_are_dropped_and_valid_ones_kept() -> anyhow::Result<()> {
    let payload = r#"{"questions": [
        {"question": "Good question?", "choices": ["A", "B", "C"], "answer": 0},
        {"question": "Broken answer", "choices": ["A", "B"], "answer": 5},
        {"question": "Duplicates", "choices": ["Same", "same"], "answer": 0}
    ]}"#;
    let backend = MockQuestionBackend::new_success(payload);
    let generator = QuestionGenerator::new(Box::new(backend), config(0));

    let quiz = generator.generate(&Topic::new("science")).await?;
    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz.units[0].prompt, "Good question?");
    Ok(())
}

#[tokio::test]
async fn all_units_invalid_is_generation_error() {
    let payload = r#"{"questions": [
        {"question": "", "choices": ["A", "B"], "answer": 0}
    ]}"#;
    let backend = MockQuestionBackend::new_success(payload);
    let generator = QuestionGenerator::new(Box::new(backend), config(0));

    let err = generator.generate(&Topic::new("science")).await.unwrap_err();
    assert!(matches!(err.kind(), QuizreelErrorKind::Generation(_)));
}

#[tokio::test]
async fn response_wrapped_in_markdown_fences_is_accepted() -> anyhow::Result<()> {
    let payload = format!("Here is your quiz:\n```json\n{}\n```\n", quiz_json(2));
    let backend = MockQuestionBackend::new_success(payload);
    let generator = QuestionGenerator::new(Box::new(backend), config(0));

    let quiz = generator.generate(&Topic::new("cinema")).await?;
    assert_eq!(quiz.len(), 2);
    Ok(())
}

#[tokio::test]
async fn extra_questions_are_trimmed_to_requested_count() -> anyhow::Result<()> {
    let backend = MockQuestionBackend::new_success(quiz_json(6));
    let generator = QuestionGenerator::new(Box::new(backend), config(0));

    let quiz = generator.generate(&Topic::new("music")).await?;
    assert_eq!(quiz.len(), 3);
    Ok(())
}
