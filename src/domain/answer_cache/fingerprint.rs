//! Question normalization and fingerprinting
//!
//! Normalization lower-cases the text (Unicode aware), trims it and collapses
//! every run of whitespace into a single ASCII space. The fingerprint is the
//! lowercase hex SHA-256 digest of the normalized text.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::AnswerCacheError;

/// Normalize a question for exact matching.
pub fn normalize_question(question: &str) -> String {
    question
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collision-resistant digest of a normalized question
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a raw question, rejecting empty or whitespace-only text
    pub fn of(question: &str) -> Result<Self, AnswerCacheError> {
        let normalized = normalize_question(question);

        if normalized.is_empty() {
            return Err(AnswerCacheError::invalid_input(
                "question must not be empty or whitespace",
            ));
        }

        let digest = Sha256::digest(normalized.as_bytes());
        Ok(Self(hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_question() {
        assert_eq!(
            normalize_question("  What   is\tAI\nGateway? "),
            "what is ai gateway?"
        );
        assert_eq!(normalize_question("ÉCOLE"), "école");
        assert_eq!(normalize_question(" \n\t "), "");
    }

    #[test]
    fn test_fingerprint_is_case_and_whitespace_insensitive() {
        let a = Fingerprint::of("What is AI Gateway?").unwrap();
        let b = Fingerprint::of("  what is   ai gateway? ").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_punctuation() {
        let a = Fingerprint::of("What is AI Gateway?").unwrap();
        let b = Fingerprint::of("What is AI Gateway").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_rejects_blank_question() {
        let result = Fingerprint::of("   ");
        assert!(matches!(result, Err(AnswerCacheError::InvalidInput { .. })));
    }

    #[test]
    fn test_fingerprint_known_digest() {
        // sha256("hello")
        let fingerprint = Fingerprint::of("  HELLO ").unwrap();
        assert_eq!(
            fingerprint.to_string(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
