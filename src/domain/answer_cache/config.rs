//! Answer cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AnswerCacheError;

/// Configuration for the semantic answer cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerCacheConfig {
    /// Minimum cosine similarity for a similar-question hit (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Number of nearest neighbours considered by a similarity lookup
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,

    /// Embedding model used for question embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Upper bound for a single embedding call, in milliseconds
    #[serde(default = "default_embedding_timeout_ms")]
    pub embedding_timeout_ms: u64,

    /// Pin the embedding dimensionality instead of learning it from the
    /// first recorded question
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Retention hook: maximum number of records, unbounded when unset
    #[serde(default)]
    pub max_entries: Option<usize>,

    /// Retention hook: record time-to-live in seconds, unbounded when unset
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

fn default_similarity_threshold() -> f32 {
    0.85
}

fn default_neighbors() -> usize {
    1
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_timeout_ms() -> u64 {
    10_000
}

impl Default for AnswerCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            neighbors: default_neighbors(),
            embedding_model: default_embedding_model(),
            embedding_timeout_ms: default_embedding_timeout_ms(),
            dimensions: None,
            max_entries: None,
            ttl_secs: None,
        }
    }
}

impl AnswerCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the embedding timeout as Duration
    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    /// Get the TTL as Duration, if retention by age is enabled
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = Some(ttl.as_secs());
        self
    }

    /// Reject configurations the cache cannot honour
    pub fn validate(&self) -> Result<(), AnswerCacheError> {
        validate_threshold(self.similarity_threshold)?;

        if self.neighbors == 0 {
            return Err(AnswerCacheError::invalid_input("neighbors must be at least 1"));
        }

        if self.embedding_timeout_ms == 0 {
            return Err(AnswerCacheError::invalid_input(
                "embedding_timeout_ms must be at least 1",
            ));
        }

        if self.max_entries == Some(0) {
            return Err(AnswerCacheError::invalid_input(
                "max_entries must be at least 1 when set",
            ));
        }

        if self.dimensions == Some(0) {
            return Err(AnswerCacheError::invalid_input(
                "dimensions must be at least 1 when set",
            ));
        }

        Ok(())
    }
}

/// Thresholds are cosine similarities in `[0, 1]`
pub fn validate_threshold(threshold: f32) -> Result<(), AnswerCacheError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AnswerCacheError::invalid_input(format!(
            "similarity threshold must be within [0, 1], got {}",
            threshold
        )));
    }

    Ok(())
}
