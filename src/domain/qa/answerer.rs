use async_trait::async_trait;
use std::fmt::Debug;

use super::AnsweringMode;
use crate::domain::llm::ChatStream;
use crate::domain::retrieval::ContextDocument;
use crate::domain::DomainError;

/// Turns retrieved passages into an answer with one or more model calls
#[async_trait]
pub trait Answerer: Send + Sync + Debug {
    async fn answer(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<String, DomainError>;

    /// Like `answer`, but the final model call is streamed
    async fn answer_stream(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<ChatStream, DomainError>;

    fn mode(&self) -> AnsweringMode;
}
