//! Embedding provider implementations

mod cached;
mod hashing;
mod openai;

pub use cached::CachedEmbeddingProvider;
pub use hashing::{trigram_embedding, HashingEmbeddingProvider, DEFAULT_HASHING_DIMENSIONS};
pub use openai::OpenAiEmbeddingProvider;
