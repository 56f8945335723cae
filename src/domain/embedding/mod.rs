//! Embedding provider domain models and traits

mod provider;
mod request;
mod response;
mod vector;

pub use provider::{embed_one, embed_text, EmbeddingProvider};
pub use request::EmbeddingRequest;
pub use response::EmbeddingResponse;
pub use vector::{cosine_similarity, l2_normalize};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
