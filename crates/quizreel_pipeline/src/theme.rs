//! Theme selection with repeat avoidance.

use quizreel_core::{SelectionConfig, Topic};
use quizreel_error::{ConfigError, QuizreelResult};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, instrument};

/// How many used topics the history retains, independent of the exclusion
/// window.
const HISTORY_CAPACITY: usize = 32;

/// Recently used topics, most recent last.
///
/// Explicit state with a load-at-start / persist-at-end lifecycle, injected
/// into selection rather than held as a singleton, so runs stay
/// independently testable. Concurrent runs must funnel updates through a
/// single writer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionHistory {
    recent: VecDeque<String>,
}

impl SelectionHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load history from a JSON file; a missing file yields empty history.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file exists but cannot be parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> QuizreelResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No selection history yet, starting empty");
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read history {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ConfigError::new(format!("Failed to parse history {}: {}", path.display(), e)).into()
        })
    }

    /// Persist history to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file cannot be written.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> QuizreelResult<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize history: {}", e)))?;
        std::fs::write(path, contents).map_err(|e| {
            ConfigError::new(format!("Failed to write history {}: {}", path.display(), e)).into()
        })
    }

    /// Record a topic as used, trimming the oldest entries past capacity.
    pub fn record(&mut self, topic: &Topic) {
        self.recent.push_back(topic.slug.clone());
        while self.recent.len() > HISTORY_CAPACITY {
            self.recent.pop_front();
        }
    }

    /// The last `n` used topic slugs.
    pub fn last_used(&self, n: usize) -> Vec<&str> {
        self.recent
            .iter()
            .rev()
            .take(n)
            .map(|s| s.as_str())
            .collect()
    }
}

/// Picks a topic from the configured set, avoiding recent repeats.
pub struct ThemeSelector;

impl ThemeSelector {
    /// Select a topic.
    ///
    /// Weighted-random choice (uniform when no weights are configured)
    /// excluding the last `exclude_recent` used topics, unless exclusion
    /// would leave no candidates, in which case the whole set is eligible.
    /// The caller is responsible for recording the choice in the history.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configured theme set is empty.
    #[instrument(skip(config, history), fields(themes = config.themes.len()))]
    pub fn select(config: &SelectionConfig, history: &SelectionHistory) -> QuizreelResult<Topic> {
        if config.themes.is_empty() {
            return Err(ConfigError::new("selection.themes must not be empty").into());
        }

        let topics: Vec<Topic> = config.themes.iter().map(Topic::new).collect();
        let excluded = history.last_used(config.exclude_recent);

        let mut pool: Vec<&Topic> = topics
            .iter()
            .filter(|t| !excluded.contains(&t.slug.as_str()))
            .collect();
        if pool.is_empty() {
            debug!("Exclusion window covers every theme, falling back to the full set");
            pool = topics.iter().collect();
        }

        let chosen = pool
            .choose_weighted(&mut rand::thread_rng(), |t| {
                config.weights.get(&t.label).copied().unwrap_or(1.0)
            })
            .map_err(|e| ConfigError::new(format!("Theme selection failed: {}", e)))?;

        debug!(topic = %chosen.slug, "Selected topic");
        Ok((*chosen).clone())
    }
}
