//! Answer cache error taxonomy

use thiserror::Error;

use crate::domain::DomainError;

/// Failures surfaced by answer cache operations.
///
/// A cache miss is never represented here: `Ok(None)` means the question was
/// genuinely not found, an `Err` means the cache could not check.
#[derive(Debug, Error)]
pub enum AnswerCacheError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index corruption: {message}")]
    IndexCorruption { message: String },
}

impl AnswerCacheError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn embedding_unavailable(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
        }
    }

    pub fn index_corruption(message: impl Into<String>) -> Self {
        Self::IndexCorruption {
            message: message.into(),
        }
    }

    /// Whether a caller may still fall back to an exact-only lookup or a
    /// fresh answer after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmbeddingUnavailable { .. })
    }
}

impl From<DomainError> for AnswerCacheError {
    fn from(error: DomainError) -> Self {
        Self::embedding_unavailable(error.to_string())
    }
}
