//! Semantic answer cache domain models and traits
//!
//! Avoids recomputing expensive answers for repeated questions: an exact
//! lookup by normalized fingerprint, then a nearest-neighbour lookup over
//! question embeddings.

mod config;
mod error;
mod fingerprint;
mod lookup;
mod record;
mod repository;

pub use config::{validate_threshold, AnswerCacheConfig};
pub use error::AnswerCacheError;
pub use fingerprint::{normalize_question, Fingerprint};
pub use lookup::{AnswerCacheStats, CacheLookup, HitKind, SimilarMatch, SimilarityParams};
pub use record::QuestionRecord;
pub use repository::AnswerCache;
