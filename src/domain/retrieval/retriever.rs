//! Retriever trait

use async_trait::async_trait;

use super::ContextDocument;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Source of context passages relevant to a question
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `limit` passages, most relevant first
    async fn retrieve(
        &self,
        question: &str,
        limit: usize,
    ) -> Result<Vec<ContextDocument>, DomainError>;
}
