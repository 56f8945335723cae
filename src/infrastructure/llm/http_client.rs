use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::domain::DomainError;

/// Raw body chunks of a streamed response
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// JSON-over-HTTP transport used by the OpenAI-compatible providers
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    /// POST and hand back the response body as it arrives
    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose requests fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(|client| Self { client })
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Send the request and turn non-2xx statuses into provider errors
    async fn send(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, DomainError> {
        let request = headers
            .into_iter()
            .fold(self.client.post(url), |request, (key, value)| {
                request.header(key, value)
            });

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(DomainError::provider("http", format!("HTTP {}: {}", status, detail)))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.send(url, headers, body)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<ByteStream, DomainError> {
        let response = self.send(url, headers, body).await?;

        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| DomainError::provider("http", format!("Stream error: {}", e)))
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Canned replies keyed by URL.
    ///
    /// Every request body is recorded, streamed or not.
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        responses: RwLock<HashMap<String, serde_json::Value>>,
        streams: RwLock<HashMap<String, Vec<Bytes>>>,
        errors: RwLock<HashMap<String, String>>,
        bodies: RwLock<Vec<serde_json::Value>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, response: serde_json::Value) -> Self {
            self.responses.write().unwrap().insert(url.into(), response);
            self
        }

        /// Serve `chunks` one by one from `post_json_stream`
        pub fn with_stream(self, url: impl Into<String>, chunks: Vec<&str>) -> Self {
            let chunks = chunks
                .into_iter()
                .map(|chunk| Bytes::from(chunk.to_string()))
                .collect();
            self.streams.write().unwrap().insert(url.into(), chunks);
            self
        }

        pub fn with_error(self, url: impl Into<String>, error: impl Into<String>) -> Self {
            self.errors.write().unwrap().insert(url.into(), error.into());
            self
        }

        pub fn bodies(&self) -> Vec<serde_json::Value> {
            self.bodies.read().unwrap().clone()
        }

        fn record(&self, url: &str, body: &serde_json::Value) -> Result<(), DomainError> {
            self.bodies.write().unwrap().push(body.clone());

            match self.errors.read().unwrap().get(url) {
                Some(error) => Err(DomainError::provider("mock", error)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn post_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &serde_json::Value,
        ) -> Result<serde_json::Value, DomainError> {
            self.record(url, body)?;

            self.responses
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| DomainError::provider("mock", format!("No mock response for {}", url)))
        }

        async fn post_json_stream(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &serde_json::Value,
        ) -> Result<ByteStream, DomainError> {
            self.record(url, body)?;

            let chunks = self
                .streams
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| DomainError::provider("mock", format!("No mock stream for {}", url)))?;

            Ok(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok))))
        }
    }
}
