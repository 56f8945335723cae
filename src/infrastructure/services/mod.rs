//! Infrastructure services

mod map_rerank_answerer;
mod qa_session;
mod quiz_generator;
mod stuff_answerer;

pub use map_rerank_answerer::MapRerankAnswerer;
pub use qa_session::QaSession;
pub use quiz_generator::QuizGenerator;
pub use stuff_answerer::StuffAnswerer;
