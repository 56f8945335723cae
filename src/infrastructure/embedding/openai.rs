//! Embeddings from an OpenAI-compatible `/v1/embeddings`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;
use crate::infrastructure::llm::{HttpClientTrait, OpenAiEndpoint};

const EMBEDDINGS_PATH: &str = "/v1/embeddings";

/// Native vector sizes of the hosted models
const NATIVE_DIMENSIONS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    endpoint: OpenAiEndpoint,
    dimensions: Option<usize>,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, endpoint: OpenAiEndpoint) -> Self {
        Self {
            client,
            endpoint,
            dimensions: None,
        }
    }

    /// Shorten every vector to `dimensions` unless a request asks otherwise
    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        self.dimensions = dimensions;
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        if request.is_empty() {
            return Err(DomainError::validation("Embedding input must not be empty"));
        }

        let body = serde_json::to_value(EmbeddingsBody {
            model: request.model(),
            input: request.texts(),
            encoding_format: "float",
            dimensions: request.dimensions().or(self.dimensions),
        })
        .map_err(|e| DomainError::provider("openai", format!("Failed to encode request: {}", e)))?;

        let json = self
            .client
            .post_json(&self.endpoint.url(EMBEDDINGS_PATH), self.endpoint.headers(), &body)
            .await?;

        let embeddings: Embeddings = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse embedding response: {}", e))
        })?;
        embeddings.into_response(request.len())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        "text-embedding-3-small"
    }

    fn dimensions(&self, model: &str) -> Option<usize> {
        self.dimensions.or_else(|| {
            NATIVE_DIMENSIONS
                .iter()
                .find(|(name, _)| *name == model)
                .map(|(_, dims)| *dims)
        })
    }
}

#[derive(Serialize)]
struct EmbeddingsBody<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct Embeddings {
    model: String,
    data: Vec<EmbeddingData>,
    usage: Option<EmbeddingsUsage>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingsUsage {
    prompt_tokens: u32,
}

impl Embeddings {
    /// Vectors in input order; the API does not promise ordered `data`
    fn into_response(mut self, expected: usize) -> Result<EmbeddingResponse, DomainError> {
        if self.data.len() != expected {
            return Err(DomainError::provider(
                "openai",
                format!("Expected {} embeddings, received {}", expected, self.data.len()),
            ));
        }

        self.data.sort_by_key(|item| item.index);
        let vectors = self.data.into_iter().map(|item| item.embedding).collect();

        let response = EmbeddingResponse::new(self.model, vectors);
        Ok(match self.usage {
            Some(usage) => response.with_prompt_tokens(usage.prompt_tokens),
            None => response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn provider(client: MockHttpClient) -> OpenAiEmbeddingProvider<MockHttpClient> {
        OpenAiEmbeddingProvider::new(client, OpenAiEndpoint::new("test-api-key", None))
    }

    /// Reply with `count` vectors of `dimensions`, listed in reverse index order
    fn reply(count: usize, dimensions: usize) -> serde_json::Value {
        let data: Vec<serde_json::Value> = (0..count)
            .rev()
            .map(|i| {
                serde_json::json!({
                    "object": "embedding",
                    "index": i,
                    "embedding": vec![i as f32; dimensions],
                })
            })
            .collect();

        serde_json::json!({
            "model": "text-embedding-3-small",
            "data": data,
            "usage": { "prompt_tokens": 10, "total_tokens": 10 }
        })
    }

    #[tokio::test]
    async fn test_embed_question() {
        let provider = provider(MockHttpClient::new().with_response(TEST_URL, reply(1, 1536)));

        let response = provider
            .embed(EmbeddingRequest::single("text-embedding-3-small", "What is AI Gateway?"))
            .await
            .unwrap();

        assert_eq!(response.vectors()[0].len(), 1536);
        assert_eq!(response.prompt_tokens(), Some(10));

        let body = &provider.client.bodies()[0];
        assert_eq!(body["input"], serde_json::json!(["What is AI Gateway?"]));
        assert_eq!(body["encoding_format"], "float");
        assert!(body.get("dimensions").is_none());
    }

    #[tokio::test]
    async fn test_batch_is_returned_in_input_order() {
        let provider = provider(MockHttpClient::new().with_response(TEST_URL, reply(3, 2)));

        let response = provider
            .embed(EmbeddingRequest::batch(
                "text-embedding-3-small",
                vec!["a".into(), "b".into(), "c".into()],
            ))
            .await
            .unwrap();

        let firsts: Vec<f32> = response.vectors().iter().map(|v| v[0]).collect();
        assert_eq!(firsts, vec![0.0, 1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_configured_dimensions_are_sent() {
        let provider = provider(
            MockHttpClient::new()
                .with_response(TEST_URL, reply(1, 256)),
        )
        .with_dimensions(Some(256));

        provider
            .embed(EmbeddingRequest::single("text-embedding-3-small", "q"))
            .await
            .unwrap();
        provider
            .embed(EmbeddingRequest::single("text-embedding-3-small", "q").with_dimensions(Some(64)))
            .await
            .unwrap();

        let bodies = provider.client.bodies();
        assert_eq!(bodies[0]["dimensions"], 256);
        assert_eq!(bodies[1]["dimensions"], 64);
        assert_eq!(provider.dimensions("text-embedding-3-small"), Some(256));
    }

    #[tokio::test]
    async fn test_count_mismatch_is_an_error() {
        let provider = provider(MockHttpClient::new().with_response(TEST_URL, reply(1, 8)));

        let result = provider
            .embed(EmbeddingRequest::batch("text-embedding-3-small", vec!["a".into(), "b".into()]))
            .await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let provider = provider(MockHttpClient::new().with_error(TEST_URL, "Rate limit exceeded"));

        assert!(provider
            .embed(EmbeddingRequest::single("text-embedding-3-small", "Hello"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_before_request() {
        let provider = provider(MockHttpClient::new());

        let result = provider
            .embed(EmbeddingRequest::batch("text-embedding-3-small", vec![]))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(provider.client.bodies().is_empty());
    }

    #[test]
    fn test_native_dimensions() {
        let provider = provider(MockHttpClient::new());

        assert_eq!(provider.default_model(), "text-embedding-3-small");
        assert_eq!(provider.dimensions("text-embedding-3-large"), Some(3072));
        assert_eq!(provider.dimensions("unknown-model"), None);
    }
}
