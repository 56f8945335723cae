//! In-memory document store with embedding-based retrieval

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::embedding::{cosine_similarity, embed_text, EmbeddingProvider, EmbeddingRequest};
use crate::domain::retrieval::{ContextDocument, Retriever};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct StoredDoc {
    document: ContextDocument,
    embedding: Vec<f32>,
}

/// Pre-chunked documents held in memory and ranked by cosine similarity
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    embedder: Arc<dyn EmbeddingProvider>,
    model: String,
    documents: RwLock<Vec<StoredDoc>>,
}

impl InMemoryDocumentStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            embedder,
            model: model.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Embed and store documents with a single batch request
    pub async fn add_documents(&self, documents: Vec<ContextDocument>) -> Result<usize, DomainError> {
        if documents.is_empty() {
            return Ok(0);
        }

        for document in &documents {
            document.validate()?;
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let response = self
            .embedder
            .embed(EmbeddingRequest::batch(&self.model, texts))
            .await
            .map_err(|e| DomainError::retrieval(format!("Failed to embed documents: {}", e)))?;

        let vectors = response.into_vectors();

        if vectors.len() != documents.len() {
            return Err(DomainError::retrieval(format!(
                "Expected {} document embeddings, received {}",
                documents.len(),
                vectors.len()
            )));
        }

        let count = documents.len();
        let mut stored = self.documents.write().await;

        stored.extend(
            documents
                .into_iter()
                .zip(vectors)
                .map(|(document, embedding)| StoredDoc {
                    document,
                    embedding,
                }),
        );

        tracing::info!(added = count, total = stored.len(), "Indexed context documents");

        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Retriever for InMemoryDocumentStore {
    async fn retrieve(
        &self,
        question: &str,
        limit: usize,
    ) -> Result<Vec<ContextDocument>, DomainError> {
        if limit == 0 || self.is_empty().await {
            return Ok(Vec::new());
        }

        let query = embed_text(self.embedder.as_ref(), &self.model, question)
            .await
            .map_err(|e| DomainError::retrieval(format!("Failed to embed question: {}", e)))?;

        let docs = self.documents.read().await;

        let mut scored: Vec<(f32, &StoredDoc)> = docs
            .iter()
            .map(|doc| (cosine_similarity(&query, &doc.embedding), doc))
            .collect();

        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, doc)| doc.document.clone())
            .collect())
    }
}
