//! Context documents supplied to the answering step

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A pre-split passage of the corpus together with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub content: String,
    pub source: String,
    /// Last modification date as published by the source, used to favour
    /// recent answers
    #[serde(default, alias = "lastmod", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl ContextDocument {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    /// Date label used in prompts
    pub fn date_label(&self) -> &str {
        self.last_modified.as_deref().unwrap_or("unknown")
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "document from '{}' has no content",
                self.source
            )));
        }

        Ok(())
    }
}

/// Parse a corpus given as a JSON array of documents
pub fn parse_corpus(json: &str) -> Result<Vec<ContextDocument>, DomainError> {
    let documents: Vec<ContextDocument> = serde_json::from_str(json)
        .map_err(|e| DomainError::validation(format!("Invalid corpus: {}", e)))?;

    for document in &documents {
        document.validate()?;
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corpus() {
        let json = r#"[
            {"content": "AI Gateway proxies AI requests.", "source": "https://developers.cloudflare.com/ai-gateway/", "lastmod": "2024-05-01"},
            {"content": "Vectorize is a vector database.", "source": "https://developers.cloudflare.com/vectorize/"}
        ]"#;

        let documents = parse_corpus(json).unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].last_modified.as_deref(), Some("2024-05-01"));
        assert_eq!(documents[1].date_label(), "unknown");
    }

    #[test]
    fn test_parse_corpus_rejects_empty_content() {
        let json = r#"[{"content": "  ", "source": "empty.md"}]"#;

        let result = parse_corpus(json);

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_parse_corpus_rejects_malformed_json() {
        assert!(parse_corpus("{not json").is_err());
    }
}
