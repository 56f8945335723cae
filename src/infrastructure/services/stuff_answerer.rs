use std::sync::Arc;

use async_trait::async_trait;

use super::map_rerank_answerer::DEFAULT_TEMPERATURE;
use crate::domain::llm::{ChatStream, LlmProvider};
use crate::domain::qa::{prompts, Answerer, AnsweringMode};
use crate::domain::retrieval::ContextDocument;
use crate::domain::DomainError;

/// Answers with a single call carrying every retrieved passage
#[derive(Debug, Clone)]
pub struct StuffAnswerer {
    llm: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl StuffAnswerer {
    pub fn new(llm: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Answerer for StuffAnswerer {
    async fn answer(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<String, DomainError> {
        let request = prompts::stuff_request(question, documents, self.temperature);
        let response = self.llm.chat(&self.model, request).await?;

        Ok(response.content().trim().to_string())
    }

    async fn answer_stream(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<ChatStream, DomainError> {
        let request = prompts::stuff_request(question, documents, self.temperature);
        self.llm.chat_stream(&self.model, request).await
    }

    fn mode(&self) -> AnsweringMode {
        AnsweringMode::Stuff
    }
}
