//! Embedding request type

/// Texts to embed with one model, optionally at a reduced vector size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingRequest {
    model: String,
    texts: Vec<String>,
    dimensions: Option<usize>,
}

impl EmbeddingRequest {
    /// Request for one question or passage
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::batch(model, vec![text.into()])
    }

    /// Request for several passages in one round trip
    pub fn batch(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            model: model.into(),
            texts,
            dimensions: None,
        }
    }

    /// Ask the provider for vectors of this size; `None` keeps its default
    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_is_a_batch_of_one() {
        let request = EmbeddingRequest::single("text-embedding-3-small", "What is Vectorize?");

        assert_eq!(request.model(), "text-embedding-3-small");
        assert_eq!(request.texts(), ["What is Vectorize?".to_string()]);
        assert_eq!(request.len(), 1);
        assert_eq!(request.dimensions(), None);
    }

    #[test]
    fn test_dimensions_override() {
        let request = EmbeddingRequest::batch("m", vec!["a".into(), "b".into()])
            .with_dimensions(Some(256));
        assert_eq!(request.dimensions(), Some(256));

        let cleared = request.with_dimensions(None);
        assert_eq!(cleared.dimensions(), None);
        assert!(EmbeddingRequest::batch("m", vec![]).is_empty());
    }
}
