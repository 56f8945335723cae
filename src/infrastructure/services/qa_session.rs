//! Cached question answering session
//!
//! Consults the answer cache before doing any retrieval or generation, and
//! records freshly generated answers so repeated questions are served from
//! the cache. Failing to record never fails the question.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::domain::answer_cache::{AnswerCache, CacheLookup, HitKind};
use crate::domain::llm::forward_stream;
use crate::domain::qa::{Answer, AnswerOrigin, Answerer, ChatHistory, EmbeddingFailurePolicy, QaError};
use crate::domain::retrieval::{ContextDocument, Retriever};

const DEFAULT_TOP_K: usize = 4;

/// Result of consulting the cache for one question
enum CacheOutcome {
    Hit(Answer),
    Miss(Recording),
}

/// How a freshly generated answer gets into the cache
enum Recording {
    /// The similarity lookup was unavailable
    Skip,
    /// The question was not embedded during lookup
    Embed,
    /// Reuse the embedding computed during lookup
    Reuse(Vec<f32>),
}

/// One question/answer loop over a shared answer cache
pub struct QaSession {
    cache: Arc<dyn AnswerCache>,
    retriever: Arc<dyn Retriever>,
    answerer: Arc<dyn Answerer>,
    top_k: usize,
    on_embedding_failure: EmbeddingFailurePolicy,
    history: RwLock<ChatHistory>,
}

impl fmt::Debug for QaSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QaSession")
            .field("cache", &self.cache)
            .field("answerer", &self.answerer)
            .field("top_k", &self.top_k)
            .field("on_embedding_failure", &self.on_embedding_failure)
            .finish_non_exhaustive()
    }
}

impl QaSession {
    pub fn new(
        cache: Arc<dyn AnswerCache>,
        retriever: Arc<dyn Retriever>,
        answerer: Arc<dyn Answerer>,
    ) -> Self {
        Self {
            cache,
            retriever,
            answerer,
            top_k: DEFAULT_TOP_K,
            on_embedding_failure: EmbeddingFailurePolicy::default(),
            history: RwLock::new(ChatHistory::new()),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_embedding_failure_policy(mut self, policy: EmbeddingFailurePolicy) -> Self {
        self.on_embedding_failure = policy;
        self
    }

    pub fn cache(&self) -> &Arc<dyn AnswerCache> {
        &self.cache
    }

    pub fn answerer(&self) -> &Arc<dyn Answerer> {
        &self.answerer
    }

    /// Snapshot of the questions and answers exchanged so far
    pub async fn history(&self) -> ChatHistory {
        self.history.read().await.clone()
    }

    /// Answer a question, from the cache when possible.
    ///
    /// The model is only called on a full miss. Invalid questions are
    /// rejected before any provider call.
    pub async fn ask(&self, question: &str) -> Result<Answer, QaError> {
        let recording = match self.consult_cache(question).await? {
            CacheOutcome::Hit(answer) => return Ok(self.remember(question, answer).await),
            CacheOutcome::Miss(recording) => recording,
        };

        let documents = self.retrieve(question).await?;
        let text = self
            .answerer
            .answer(question, &documents)
            .await
            .map_err(QaError::Generation)?;

        Ok(self.finish(question, text, recording).await)
    }

    /// Same as [`ask`](Self::ask), but a generated answer is handed to
    /// `on_token` piece by piece as the model produces it.
    ///
    /// Cache hits are returned whole without calling `on_token`.
    pub async fn ask_streaming(
        &self,
        question: &str,
        on_token: &mut (dyn FnMut(&str) + Send),
    ) -> Result<Answer, QaError> {
        let recording = match self.consult_cache(question).await? {
            CacheOutcome::Hit(answer) => return Ok(self.remember(question, answer).await),
            CacheOutcome::Miss(recording) => recording,
        };

        let documents = self.retrieve(question).await?;
        let stream = self
            .answerer
            .answer_stream(question, &documents)
            .await
            .map_err(QaError::Generation)?;
        let text = forward_stream(stream, on_token)
            .await
            .map_err(QaError::Generation)?;

        Ok(self.finish(question, text.trim().to_string(), recording).await)
    }

    async fn consult_cache(&self, question: &str) -> Result<CacheOutcome, QaError> {
        let lookup = match self.cache.lookup(question).await {
            Ok(lookup) => lookup,
            Err(e) if e.is_recoverable() => match self.on_embedding_failure {
                EmbeddingFailurePolicy::Abort => return Err(e.into()),
                EmbeddingFailurePolicy::Generate => {
                    warn!(error = %e, "Similarity lookup unavailable, answering without cache");
                    return Ok(CacheOutcome::Miss(Recording::Skip));
                }
            },
            Err(e) => return Err(e.into()),
        };

        Ok(match lookup {
            CacheLookup::Hit {
                kind,
                answer,
                similarity,
                matched_question,
            } => {
                let origin = match (kind, matched_question) {
                    (HitKind::Similar, Some(matched_question)) => AnswerOrigin::SimilarCache {
                        similarity,
                        matched_question,
                    },
                    _ => AnswerOrigin::ExactCache,
                };

                info!(origin = ?origin, "Answered from cache");
                CacheOutcome::Hit(Answer::new(answer, origin))
            }
            CacheLookup::Miss {
                embedding: Some(embedding),
            } => CacheOutcome::Miss(Recording::Reuse(embedding)),
            CacheLookup::Miss { embedding: None } => CacheOutcome::Miss(Recording::Embed),
        })
    }

    async fn retrieve(&self, question: &str) -> Result<Vec<ContextDocument>, QaError> {
        let documents = self
            .retriever
            .retrieve(question, self.top_k)
            .await
            .map_err(QaError::Retrieval)?;

        info!(
            passages = documents.len(),
            mode = ?self.answerer.mode(),
            "Generating answer"
        );

        Ok(documents)
    }

    async fn finish(&self, question: &str, text: String, recording: Recording) -> Answer {
        let recorded = self.record(question, &text, recording).await;
        let answer = Answer::new(text, AnswerOrigin::Generated { recorded });

        self.remember(question, answer).await
    }

    /// Store a generated answer; returns whether it was stored
    async fn record(&self, question: &str, answer: &str, recording: Recording) -> bool {
        let result = match recording {
            Recording::Skip => return false,
            Recording::Embed => self.cache.record(question, answer).await,
            Recording::Reuse(embedding) => {
                self.cache
                    .record_with_embedding(question, answer, embedding)
                    .await
            }
        };

        match result {
            Ok(()) => true,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Answer not cached");
                false
            }
            Err(e) => {
                error!(error = %e, "Answer not cached");
                false
            }
        }
    }

    async fn remember(&self, question: &str, answer: Answer) -> Answer {
        self.history.write().await.push_exchange(question, &answer);
        answer
    }
}
