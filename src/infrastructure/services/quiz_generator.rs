//! Two-step quiz generation: write the questions, then format them as JSON

use std::sync::Arc;

use tracing::{debug, info};

use super::map_rerank_answerer::DEFAULT_TEMPERATURE;
use crate::domain::llm::LlmProvider;
use crate::domain::qa::prompts::format_documents;
use crate::domain::quiz::{parse_quiz, prompts, Difficulty, Quiz};
use crate::domain::retrieval::ContextDocument;
use crate::domain::DomainError;

const DEFAULT_QUESTION_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct QuizGenerator {
    llm: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    question_count: usize,
}

impl QuizGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    /// Generate a quiz grounded in `documents`
    pub async fn generate(
        &self,
        documents: &[ContextDocument],
        difficulty: Difficulty,
    ) -> Result<Quiz, DomainError> {
        if documents.is_empty() {
            return Err(DomainError::validation("No documents to build a quiz from"));
        }

        if self.question_count == 0 {
            return Err(DomainError::validation("Quiz must ask at least one question"));
        }

        let context = format_documents(documents);
        let request =
            prompts::questions_request(&context, self.question_count, difficulty, self.temperature);
        let questions = self.llm.chat(&self.model, request).await?;

        debug!(chars = questions.content().len(), "Drafted quiz questions");

        let request = prompts::formatting_request(questions.content(), self.temperature);
        let formatted = self.llm.chat(&self.model, request).await?;

        let quiz = parse_quiz(formatted.content())?;
        info!(
            questions = quiz.questions.len(),
            difficulty = ?difficulty,
            "Generated quiz"
        );

        Ok(quiz)
    }
}
