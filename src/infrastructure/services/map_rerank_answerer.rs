//! Map-rerank answering over retrieved passages
//!
//! Every passage is answered independently and self-scored by the model, then
//! a final call picks among the scored answers.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use crate::domain::llm::{ChatStream, LlmProvider};
use crate::domain::qa::{prompts, Answerer, AnsweringMode, ScoredAnswer};
use crate::domain::retrieval::ContextDocument;
use crate::domain::DomainError;

pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Answers a question from a set of passages with a map step and a choose step
#[derive(Debug, Clone)]
pub struct MapRerankAnswerer {
    llm: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl MapRerankAnswerer {
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

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer the question once per passage, concurrently.
    ///
    /// Results are ordered by descending score; passages keep retrieval order
    /// among equal scores.
    pub async fn score_answers(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<Vec<ScoredAnswer>, DomainError> {
        let calls = documents.iter().map(|document| async move {
            let request = prompts::answer_request(question, document, self.temperature);
            let response = self.llm.chat(&self.model, request).await?;

            Ok::<_, DomainError>(ScoredAnswer::from_completion(response.content(), document))
        });

        let mut answers = join_all(calls)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        answers.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            passages = documents.len(),
            best_score = answers.first().map(|a| a.score),
            "Scored passage answers"
        );

        Ok(answers)
    }

    /// Ask the model to pick the final answer among scored ones
    pub async fn choose(
        &self,
        question: &str,
        answers: &[ScoredAnswer],
    ) -> Result<String, DomainError> {
        let request = prompts::choose_request(question, answers, self.temperature);
        let response = self.llm.chat(&self.model, request).await?;

        Ok(response.content().trim().to_string())
    }
}

#[async_trait]
impl Answerer for MapRerankAnswerer {
    async fn answer(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<String, DomainError> {
        let answers = self.score_answers(question, documents).await?;
        self.choose(question, &answers).await
    }

    async fn answer_stream(
        &self,
        question: &str,
        documents: &[ContextDocument],
    ) -> Result<ChatStream, DomainError> {
        let answers = self.score_answers(question, documents).await?;
        let request = prompts::choose_request(question, &answers, self.temperature);

        self.llm.chat_stream(&self.model, request).await
    }

    fn mode(&self) -> AnsweringMode {
        AnsweringMode::MapRerank
    }
}
