//! Infrastructure layer - External service implementations

pub mod answer_cache;
pub mod embedding;
pub mod llm;
pub mod logging;
pub mod retrieval;
pub mod services;
