use serde::{Deserialize, Serialize};

/// What a session does when the question cannot be embedded for a
/// similarity lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingFailurePolicy {
    /// Log a warning, generate a fresh answer and skip recording it
    #[default]
    Generate,
    /// Return the embedding error to the caller
    Abort,
}

/// How retrieved passages become an answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsweringMode {
    /// Score an answer per passage, then pick among them
    #[default]
    MapRerank,
    /// One call with every passage in the prompt
    Stuff,
}
