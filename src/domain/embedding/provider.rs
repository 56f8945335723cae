//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, local hashing, ...)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    fn default_model(&self) -> &'static str;

    /// Embedding dimensions for a model, when known up front
    fn dimensions(&self, model: &str) -> Option<usize>;
}

/// Embed a single text and return its vector
pub async fn embed_text(
    provider: &dyn EmbeddingProvider,
    model: &str,
    text: &str,
) -> Result<Vec<f32>, DomainError> {
    embed_one(provider, EmbeddingRequest::single(model, text)).await
}

/// Send a one-text request and return its vector
pub async fn embed_one(
    provider: &dyn EmbeddingProvider,
    request: EmbeddingRequest,
) -> Result<Vec<f32>, DomainError> {
    let response = provider.embed(request).await?;

    response
        .into_vectors()
        .into_iter()
        .next()
        .ok_or_else(|| {
            DomainError::provider(provider.provider_name(), "No embedding returned")
        })
}
