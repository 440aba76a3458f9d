//! Quiz specification types.

use serde::{Deserialize, Serialize};

/// One multiple-choice question: prompt, ordered choices, and the index of
/// the correct choice.
///
/// # Examples
///
/// ```
/// use quizreel_core::QuestionUnit;
///
/// let unit = QuestionUnit {
///     prompt: "Which planet is closest to the sun?".to_string(),
///     choices: vec!["Venus".into(), "Mercury".into(), "Mars".into()],
///     correct_index: 1,
///     duration_hint_secs: None,
/// };
/// assert_eq!(unit.correct_choice(), Some("Mercury"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionUnit {
    /// The question text
    pub prompt: String,
    /// Ordered answer choices
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer
    pub correct_index: usize,
    /// Optional display duration hint in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hint_secs: Option<f64>,
}

impl QuestionUnit {
    /// The text of the correct choice, if the index is in range.
    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.correct_index).map(|s| s.as_str())
    }
}

/// The structured set of questions for one pipeline run.
///
/// Produced by the question generator, consumed read-only by every later
/// stage. Invariants (enforced at generation time): at least one unit, each
/// unit has at least two choices, exactly one in-range correct index, and
/// no duplicate choice text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSpec {
    /// Ordered question units
    pub units: Vec<QuestionUnit>,
}

impl QuizSpec {
    /// Number of question units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when the spec holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
