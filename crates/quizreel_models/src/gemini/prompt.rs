//! Prompt construction for quiz generation.

use quizreel_core::Topic;

/// System prompt fixing the output contract.
pub(crate) const SYSTEM_PROMPT: &str = "You are a quiz author. \
Output ONLY valid JSON matching the requested schema, with no markdown \
fences and no commentary.";

/// Build the user prompt requesting `count` questions about `topic`.
///
/// The schema mirrors what the validator expects downstream: a `questions`
/// array of objects with `question`, `choices` (exactly four strings), and
/// a zero-based `answer` index.
pub(crate) fn quiz_prompt(topic: &Topic, count: usize) -> String {
    format!(
        r#"Generate {count} multiple-choice quiz questions about "{topic}".

For each question:
- Provide exactly 4 answer choices.
- Indicate the correct choice by its zero-based index.
- The correct answer must be factually verifiable.
- Questions must be varied and cover different aspects of the topic.
- Keep each question under 200 characters.

Respond with JSON in exactly this shape:

{{
  "questions": [
    {{
      "question": "Question text",
      "choices": ["Choice A", "Choice B", "Choice C", "Choice D"],
      "answer": 2
    }}
  ]
}}"#,
        count = count,
        topic = topic.label
    )
}
