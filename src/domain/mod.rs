//! Domain layer - Core business logic and entities

pub mod answer_cache;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod qa;
pub mod quiz;
pub mod retrieval;

pub use answer_cache::{AnswerCache, AnswerCacheConfig, AnswerCacheError, CacheLookup, HitKind};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use qa::{Answer, AnswerOrigin, Answerer, AnsweringMode, EmbeddingFailurePolicy, QaError};
pub use quiz::{Difficulty, Quiz};
pub use retrieval::{ContextDocument, Retriever};
