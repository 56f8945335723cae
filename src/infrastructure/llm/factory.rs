use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::http_client::HttpClient;
use super::{OpenAiEndpoint, OpenAiProvider};
use crate::config::{EmbeddingProviderKind, EmbeddingSettings, LlmSettings};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::llm::LlmProvider;
use crate::domain::DomainError;
use crate::infrastructure::embedding::{
    CachedEmbeddingProvider, HashingEmbeddingProvider, OpenAiEmbeddingProvider,
    DEFAULT_HASHING_DIMENSIONS,
};

/// Factory for creating chat and embedding providers from settings
#[derive(Debug)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the chat provider used for answer generation
    pub fn create_llm(settings: &LlmSettings) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = settings.resolved_api_key().ok_or_else(|| {
            DomainError::configuration(
                "No API key for the chat provider: set llm.api_key or OPENAI_API_KEY",
            )
        })?;

        let client = HttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;

        if let Some(url) = &settings.base_url {
            info!(base_url = %url, "Using OpenAI-compatible chat provider");
        }
        let endpoint = OpenAiEndpoint::new(&api_key, settings.base_url.as_deref());

        Ok(Arc::new(OpenAiProvider::new(client, endpoint)))
    }

    /// Create the embedding provider, memoized by a bounded cache
    pub fn create_embedder(
        settings: &EmbeddingSettings,
        request_timeout: Duration,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let ttl = Duration::from_secs(settings.cache_ttl_secs);

        match settings.provider {
            EmbeddingProviderKind::Hashing => {
                let dimensions = settings.dimensions.unwrap_or(DEFAULT_HASHING_DIMENSIONS);
                info!(dimensions, "Using offline hashing embeddings");

                Ok(Arc::new(CachedEmbeddingProvider::new(
                    HashingEmbeddingProvider::new(dimensions),
                    ttl,
                    settings.cache_capacity,
                )))
            }
            EmbeddingProviderKind::Openai => {
                let api_key = settings.resolved_api_key().ok_or_else(|| {
                    DomainError::configuration(
                        "No API key for the embedding provider: set embedding.api_key or OPENAI_API_KEY",
                    )
                })?;

                let client = HttpClient::with_timeout(request_timeout)?;
                let endpoint = OpenAiEndpoint::new(&api_key, settings.base_url.as_deref());
                let provider = OpenAiEmbeddingProvider::new(client, endpoint)
                    .with_dimensions(settings.dimensions);

                Ok(Arc::new(CachedEmbeddingProvider::new(
                    provider,
                    ttl,
                    settings.cache_capacity,
                )))
            }
        }
    }
}
