//! Answer cache trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{AnswerCacheError, AnswerCacheStats, CacheLookup, SimilarMatch, SimilarityParams};

/// Exact and semantic cache of resolved question/answer pairs.
///
/// Implementations must keep the exact map and the semantic index in step:
/// every indexed record is reachable by its fingerprint, and readers never
/// observe one half of a `record` without the other.
#[async_trait]
pub trait AnswerCache: Send + Sync + Debug {
    /// Look up a question by its normalized fingerprint
    async fn check_exact(&self, question: &str) -> Result<Option<String>, AnswerCacheError>;

    /// Embed the question and return the best stored match at or above the
    /// threshold. An empty cache is a miss, not an error.
    async fn find_similar(
        &self,
        question: &str,
        params: &SimilarityParams,
    ) -> Result<Option<SimilarMatch>, AnswerCacheError>;

    /// Same as `find_similar` for a question that is already embedded
    async fn find_similar_embedded(
        &self,
        embedding: &[f32],
        params: &SimilarityParams,
    ) -> Result<Option<SimilarMatch>, AnswerCacheError>;

    /// Embed a question with the cache's provider, model and timeout
    async fn embed_question(&self, question: &str) -> Result<Vec<f32>, AnswerCacheError>;

    /// Register a resolved question/answer pair
    async fn record(&self, question: &str, answer: &str) -> Result<(), AnswerCacheError>;

    /// Register a pair whose question embedding is already known
    async fn record_with_embedding(
        &self,
        question: &str,
        answer: &str,
        embedding: Vec<f32>,
    ) -> Result<(), AnswerCacheError>;

    /// Parameters used by `lookup`
    fn similarity_params(&self) -> SimilarityParams;

    /// Exact lookup followed by a similarity lookup, in that order
    async fn lookup(&self, question: &str) -> Result<CacheLookup, AnswerCacheError> {
        if let Some(answer) = self.check_exact(question).await? {
            return Ok(CacheLookup::exact(answer));
        }

        let params = self.similarity_params();

        // Nothing to compare against, so the question is not embedded
        if self.is_empty().await? {
            return Ok(match self.find_similar(question, &params).await? {
                Some(found) => CacheLookup::similar(found),
                None => CacheLookup::Miss { embedding: None },
            });
        }

        let embedding = self.embed_question(question).await?;

        match self.find_similar_embedded(&embedding, &params).await? {
            Some(found) => Ok(CacheLookup::similar(found)),
            None => Ok(CacheLookup::Miss {
                embedding: Some(embedding),
            }),
        }
    }

    /// Number of records in the semantic index
    async fn len(&self) -> Result<usize, AnswerCacheError>;

    async fn is_empty(&self) -> Result<bool, AnswerCacheError> {
        Ok(self.len().await? == 0)
    }

    /// Embedding size fixed for this cache, `None` until the first record
    async fn dimensions(&self) -> Result<Option<usize>, AnswerCacheError>;

    /// Drop every record and reset counters
    async fn clear(&self) -> Result<(), AnswerCacheError>;

    /// Remove records older than the configured TTL
    async fn purge_expired(&self) -> Result<usize, AnswerCacheError>;

    async fn stats(&self) -> Result<AnswerCacheStats, AnswerCacheError>;
}
