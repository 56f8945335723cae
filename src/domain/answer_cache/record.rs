//! Question records held by the semantic index

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Fingerprint;

/// A resolved question/answer pair together with its embedding.
///
/// Records are immutable once created; re-recording a question produces a new
/// record that replaces the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    id: Uuid,
    fingerprint: Fingerprint,
    question: String,
    answer: String,
    embedding: Vec<f32>,
    created_at: DateTime<Utc>,
    /// Insertion order within one cache instance, used to prefer fresh records
    sequence: u64,
}

impl QuestionRecord {
    pub fn new(
        fingerprint: Fingerprint,
        question: impl Into<String>,
        answer: impl Into<String>,
        embedding: Vec<f32>,
        sequence: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            fingerprint,
            question: question.into(),
            answer: answer.into(),
            embedding,
            created_at: Utc::now(),
            sequence,
        }
    }

    /// Override the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Check whether the record is older than `ttl` at `now`
    pub fn is_expired_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.created_at >= ttl,
            // A TTL too large for chrono never expires
            Err(_) => false,
        }
    }
}
