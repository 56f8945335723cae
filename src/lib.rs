//! Semantic answer cache
//!
//! Question answering over a document corpus that avoids recomputing answers:
//! - Exact lookup by normalized question fingerprint
//! - Similar-question lookup over question embeddings with a threshold
//! - Map-rerank or single-prompt answer generation over retrieved passages on
//!   a full miss, optionally streamed
//! - Multiple-choice quizzes generated from the same corpus

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::llm::LlmProvider;
use domain::qa::{Answerer, AnsweringMode};
use domain::quiz::{Difficulty, Quiz};
use domain::retrieval::{ContextDocument, Retriever};
use infrastructure::{
    answer_cache::InMemoryAnswerCache,
    llm::ProviderFactory,
    retrieval::InMemoryDocumentStore,
    services::{MapRerankAnswerer, QaSession, QuizGenerator, StuffAnswerer},
};
use tracing::info;

fn create_answerer(config: &AppConfig, llm: Arc<dyn LlmProvider>) -> Arc<dyn Answerer> {
    match config.session.answering_mode {
        AnsweringMode::MapRerank => Arc::new(
            MapRerankAnswerer::new(llm, &config.llm.model).with_temperature(config.llm.temperature),
        ),
        AnsweringMode::Stuff => Arc::new(
            StuffAnswerer::new(llm, &config.llm.model).with_temperature(config.llm.temperature),
        ),
    }
}

/// Build a QA session with a fresh answer cache over `documents`
pub async fn create_session(
    config: &AppConfig,
    documents: Vec<ContextDocument>,
) -> anyhow::Result<QaSession> {
    let request_timeout = Duration::from_secs(config.llm.timeout_secs);

    let embedder = ProviderFactory::create_embedder(&config.embedding, request_timeout)?;
    let llm = ProviderFactory::create_llm(&config.llm)?;

    let cache = InMemoryAnswerCache::new(embedder.clone(), config.cache.clone())?;

    let store = InMemoryDocumentStore::new(embedder, &config.cache.embedding_model);
    let indexed = store.add_documents(documents).await?;

    info!(
        documents = indexed,
        model = %config.llm.model,
        mode = ?config.session.answering_mode,
        threshold = config.cache.similarity_threshold,
        "QA session ready"
    );

    let answerer = create_answerer(config, llm);

    Ok(QaSession::new(Arc::new(cache), Arc::new(store), answerer)
        .with_top_k(config.retrieval.top_k)
        .with_embedding_failure_policy(config.session.on_embedding_failure))
}

/// Generate a quiz from `documents`.
///
/// With a `topic`, only the passages closest to it are used.
pub async fn generate_quiz(
    config: &AppConfig,
    documents: Vec<ContextDocument>,
    topic: Option<&str>,
    difficulty: Difficulty,
) -> anyhow::Result<Quiz> {
    let llm = ProviderFactory::create_llm(&config.llm)?;

    let documents = match topic {
        Some(topic) => {
            let request_timeout = Duration::from_secs(config.llm.timeout_secs);
            let embedder = ProviderFactory::create_embedder(&config.embedding, request_timeout)?;
            let store = InMemoryDocumentStore::new(embedder, &config.cache.embedding_model);
            store.add_documents(documents).await?;

            store.retrieve(topic, config.quiz.context_documents).await?
        }
        None => documents,
    };

    let generator = QuizGenerator::new(llm, &config.llm.model)
        .with_temperature(config.llm.temperature)
        .with_question_count(config.quiz.questions);

    Ok(generator.generate(&documents, difficulty).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingProviderKind;
    use crate::domain::answer_cache::AnswerCache;

    #[tokio::test]
    async fn test_create_session_with_offline_embeddings() {
        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashing;
        config.llm.api_key = Some("sk-test".to_string());

        let session = create_session(
            &config,
            vec![ContextDocument::new("R2 is object storage.", "r2.md")],
        )
        .await
        .unwrap();

        assert!(session.cache().is_empty().await.unwrap());
        assert_eq!(session.answerer().mode(), AnsweringMode::MapRerank);
    }

    #[tokio::test]
    async fn test_answering_mode_from_config() {
        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashing;
        config.llm.api_key = Some("sk-test".to_string());
        config.session.answering_mode = AnsweringMode::Stuff;

        let session = create_session(&config, Vec::new()).await.unwrap();

        assert_eq!(session.answerer().mode(), AnsweringMode::Stuff);
    }

    #[tokio::test]
    async fn test_repeated_question_served_from_cache_end_to_end() {
        use crate::domain::qa::AnswerOrigin;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o-mini",
                "choices": [{
                    "message": { "role": "assistant", "content": "It is a proxy for AI requests.\nScore: 5" },
                    "finish_reason": "stop"
                }]
            })))
            // One passage answer plus the choose step, for the first question only
            .expect(2)
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashing;
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.base_url = Some(server.uri());
        config.retrieval.top_k = 1;

        let session = create_session(
            &config,
            vec![ContextDocument::new("AI Gateway proxies AI requests.", "ai-gateway.md")],
        )
        .await
        .unwrap();

        let first = session.ask("What is AI Gateway?").await.unwrap();
        assert_eq!(first.origin, AnswerOrigin::Generated { recorded: true });

        let second = session.ask("what is AI gateway?").await.unwrap();
        assert_eq!(second.origin, AnswerOrigin::ExactCache);
        assert_eq!(second.text, first.text);
    }

    #[tokio::test]
    async fn test_streamed_answer_end_to_end() {
        use crate::domain::qa::AnswerOrigin;
        use wiremock::matchers::{body_string_contains, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let events = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"R2 is \"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"object storage.\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("\"stream\":true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(events),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashing;
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.base_url = Some(server.uri());
        config.session.answering_mode = AnsweringMode::Stuff;

        let session = create_session(
            &config,
            vec![ContextDocument::new("R2 is object storage.", "r2.md")],
        )
        .await
        .unwrap();

        let mut printed = String::new();
        let answer = session
            .ask_streaming("What is R2?", &mut |token: &str| printed.push_str(token))
            .await
            .unwrap();

        assert_eq!(printed, "R2 is object storage.");
        assert_eq!(answer.origin, AnswerOrigin::Generated { recorded: true });
    }

    #[tokio::test]
    async fn test_generate_quiz_end_to_end() {
        use wiremock::matchers::{body_string_contains, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn completion(content: &str) -> serde_json::Value {
            serde_json::json!({
                "id": "chatcmpl-quiz",
                "model": "gpt-4o-mini",
                "choices": [{
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            })
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("formatting algorithm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "```json\n{\"questions\":[{\"question\":\"What is R2?\",\"answers\":[{\"answer\":\"Object storage\",\"correct\":true},{\"answer\":\"A queue\",\"correct\":false},]}]}\n```",
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("role playing as a teacher"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "Question: What is R2?\nAnswers: Object storage(o)|A queue",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashing;
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.base_url = Some(server.uri());
        config.quiz.questions = 1;
        config.quiz.context_documents = 1;

        let quiz = generate_quiz(
            &config,
            vec![
                ContextDocument::new("R2 is object storage.", "r2.md"),
                ContextDocument::new("Queues deliver messages.", "queues.md"),
            ],
            Some("R2 storage"),
            Difficulty::Easy,
        )
        .await
        .unwrap();

        assert_eq!(quiz.questions.len(), 1);
        assert!(quiz.score(&[Some(0)]).is_perfect());
    }

    #[tokio::test]
    async fn test_create_session_rejects_bad_cache_config() {
        let mut config = AppConfig::default();
        config.embedding.provider = EmbeddingProviderKind::Hashing;
        config.llm.api_key = Some("sk-test".to_string());
        config.cache.neighbors = 0;

        assert!(create_session(&config, Vec::new()).await.is_err());
    }
}
