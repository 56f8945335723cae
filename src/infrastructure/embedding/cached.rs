//! Embedding provider wrapper that memoizes single-text embeddings

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Cache key: model, requested vector size and the exact text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    model: String,
    text: String,
    dimensions: Option<usize>,
}

impl CacheKey {
    fn new(request: &EmbeddingRequest, text: &str) -> Self {
        Self {
            model: request.model().to_string(),
            text: text.to_string(),
            dimensions: request.dimensions(),
        }
    }
}

/// Embedding provider wrapper with a bounded, TTL-limited embedding cache.
///
/// Batch requests go straight to the inner provider and populate the cache.
#[derive(Debug)]
pub struct CachedEmbeddingProvider<P: EmbeddingProvider> {
    inner: P,
    cache: Cache<CacheKey, Arc<Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachedEmbeddingProvider<P> {
    pub fn new(inner: P, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();

        Self { inner, cache }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }

    async fn remember(&self, request: &EmbeddingRequest, response: &EmbeddingResponse) {
        for (text, vector) in request.texts().iter().zip(response.vectors()) {
            self.cache
                .insert(CacheKey::new(request, text), Arc::new(vector.clone()))
                .await;
        }
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbeddingProvider<P> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        if let [text] = request.texts() {
            if let Some(cached) = self.cache.get(&CacheKey::new(&request, text)).await {
                tracing::debug!(
                    provider = self.inner.provider_name(),
                    model = request.model(),
                    "Embedding cache hit"
                );

                return Ok(EmbeddingResponse::new(
                    request.model(),
                    vec![(*cached).clone()],
                ));
            }
        }

        let response = self.inner.embed(request.clone()).await?;
        self.remember(&request, &response).await;

        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn default_model(&self) -> &'static str {
        self.inner.default_model()
    }

    fn dimensions(&self, model: &str) -> Option<usize> {
        self.inner.dimensions(model)
    }
}
