//! Quiz topic types.

use serde::{Deserialize, Serialize};

/// A quiz subject category drawn from the configured theme list.
///
/// Immutable once chosen for a run. The `slug` is the stable identifier
/// used for background lookup and storage key construction; the `label`
/// is the human-readable form used in prompts.
///
/// # Examples
///
/// ```
/// use quizreel_core::Topic;
///
/// let topic = Topic::new("Ancient History");
/// assert_eq!(topic.slug, "ancient_history");
/// assert_eq!(topic.label, "Ancient History");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    /// Stable identifier: lowercased, whitespace replaced by underscores
    pub slug: String,
    /// Display label as configured
    pub label: String,
}

impl Topic {
    /// Create a topic from its configured label, deriving the slug.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let slug = label
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        Self { slug, label }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}
