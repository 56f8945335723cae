//! Question answering over retrieved context

mod answer;
mod answerer;
mod error;
mod history;
mod policy;
pub mod prompts;

pub use answer::{parse_score, Answer, AnswerOrigin, ScoredAnswer, MAX_SCORE};
pub use answerer::Answerer;
pub use error::QaError;
pub use history::{ChatHistory, ChatTurn, Speaker};
pub use policy::{AnsweringMode, EmbeddingFailurePolicy};
