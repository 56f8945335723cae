use thiserror::Error;

use crate::domain::answer_cache::AnswerCacheError;
use crate::domain::DomainError;

/// Failures of a question-answering session
#[derive(Debug, Error)]
pub enum QaError {
    #[error(transparent)]
    Cache(#[from] AnswerCacheError),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[source] DomainError),

    #[error("Answer generation failed: {0}")]
    Generation(#[source] DomainError),
}
