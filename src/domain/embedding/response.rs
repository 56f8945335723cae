//! Embedding response type

/// Vectors returned for a request, in request order
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResponse {
    model: String,
    vectors: Vec<Vec<f32>>,
    prompt_tokens: Option<u32>,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, vectors: Vec<Vec<f32>>) -> Self {
        Self {
            model: model.into(),
            vectors,
            prompt_tokens: None,
        }
    }

    pub fn with_prompt_tokens(mut self, tokens: u32) -> Self {
        self.prompt_tokens = Some(tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Tokens billed for the request, when the provider reports them
    pub fn prompt_tokens(&self) -> Option<u32> {
        self.prompt_tokens
    }

    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        self.vectors
    }
}
