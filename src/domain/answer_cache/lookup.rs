//! Lookup parameters and outcomes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters for a similar-question lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityParams {
    /// Number of nearest neighbours to consider
    pub k: usize,
    /// Minimum cosine similarity for a hit
    pub threshold: f32,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            k: 1,
            threshold: 0.85,
        }
    }
}

impl SimilarityParams {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

/// A stored question close enough to the asked one
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMatch {
    pub record_id: Uuid,
    pub question: String,
    pub answer: String,
    pub similarity: f32,
}

/// How a hit was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Exact,
    Similar,
}

/// Outcome of a full lookup (exact first, then similar)
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit {
        kind: HitKind,
        answer: String,
        /// 1.0 for exact hits
        similarity: f32,
        matched_question: Option<String>,
    },
    Miss {
        /// Embedding of the asked question when one was computed, so the
        /// caller can record without embedding twice
        embedding: Option<Vec<f32>>,
    },
}

impl CacheLookup {
    pub fn exact(answer: impl Into<String>) -> Self {
        Self::Hit {
            kind: HitKind::Exact,
            answer: answer.into(),
            similarity: 1.0,
            matched_question: None,
        }
    }

    pub fn similar(found: SimilarMatch) -> Self {
        Self::Hit {
            kind: HitKind::Similar,
            answer: found.answer,
            similarity: found.similarity,
            matched_question: Some(found.question),
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Hit { answer, .. } => Some(answer),
            Self::Miss { .. } => None,
        }
    }
}

/// Counters for the answer cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerCacheStats {
    pub entries: usize,
    pub exact_hits: u64,
    pub similar_hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired: u64,
}

impl AnswerCacheStats {
    pub fn hits(&self) -> u64 {
        self.exact_hits + self.similar_hits
    }

    pub fn hit_rate(&self) -> f32 {
        let total = self.hits() + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits() as f32 / total as f32
    }
}
