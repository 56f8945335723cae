//! Context retrieval domain models and traits

mod document;
mod retriever;

pub use document::{parse_corpus, ContextDocument};
pub use retriever::Retriever;

#[cfg(test)]
pub use retriever::MockRetriever;
