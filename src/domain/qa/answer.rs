//! Answers produced by a QA session

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::retrieval::ContextDocument;

/// Highest score the answering prompt asks for
pub const MAX_SCORE: u8 = 5;

static SCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*score\s*:\s*(\d+)").expect("valid score regex"));

/// Where an answer came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerOrigin {
    /// Verbatim (normalized) repeat of a recorded question
    ExactCache,
    /// Near-duplicate of a recorded question
    SimilarCache {
        similarity: f32,
        matched_question: String,
    },
    /// Freshly generated; `recorded` is false when caching was skipped
    Generated { recorded: bool },
}

impl AnswerOrigin {
    pub fn is_cached(&self) -> bool {
        !matches!(self, AnswerOrigin::Generated { .. })
    }
}

/// Final answer handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub origin: AnswerOrigin,
}

impl Answer {
    pub fn new(text: impl Into<String>, origin: AnswerOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            AnswerOrigin::ExactCache => write!(f, "(Cached)\n\n{}", self.text),
            AnswerOrigin::SimilarCache { .. } => {
                write!(f, "(Similar question found)\n\n{}", self.text)
            }
            AnswerOrigin::Generated { .. } => f.write_str(&self.text),
        }
    }
}

/// Answer drawn from a single context passage, with its self-reported score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnswer {
    pub answer: String,
    pub score: u8,
    pub source: String,
    pub date: String,
}

impl ScoredAnswer {
    /// Build from a model completion; a missing score counts as 0
    pub fn from_completion(completion: &str, document: &ContextDocument) -> Self {
        Self {
            answer: completion.trim().to_string(),
            score: parse_score(completion),
            source: document.source.clone(),
            date: document.date_label().to_string(),
        }
    }
}

/// Extract the last `Score: N` line, clamped to `MAX_SCORE`
pub fn parse_score(completion: &str) -> u8 {
    SCORE_PATTERN
        .captures_iter(completion)
        .last()
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|score| score.min(MAX_SCORE as u32) as u8)
        .unwrap_or(0)
}
