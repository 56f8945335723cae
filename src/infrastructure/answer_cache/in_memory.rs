//! In-memory answer cache implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::answer_cache::{
    validate_threshold, AnswerCache, AnswerCacheConfig, AnswerCacheError, AnswerCacheStats,
    Fingerprint, QuestionRecord, SimilarMatch, SimilarityParams,
};
use crate::domain::embedding::{cosine_similarity, embed_one, EmbeddingProvider, EmbeddingRequest};

#[derive(Debug, Clone)]
struct ExactEntry {
    answer: String,
    sequence: u64,
    created_at: DateTime<Utc>,
}

/// Exact map and semantic index, always updated together under one lock
#[derive(Debug, Default)]
struct CacheState {
    exact: HashMap<Fingerprint, ExactEntry>,
    /// Ordered by ascending sequence
    records: Vec<QuestionRecord>,
    dimensions: Option<usize>,
    next_sequence: u64,
}

impl CacheState {
    fn remove_record(&mut self, fingerprint: &Fingerprint) -> Option<QuestionRecord> {
        let position = self
            .records
            .iter()
            .position(|record| record.fingerprint() == fingerprint)?;

        Some(self.records.remove(position))
    }

    /// Drop the record at `position` and the exact entry pointing at it
    fn evict_at(&mut self, position: usize) -> QuestionRecord {
        let record = self.records.remove(position);

        let owned = self
            .exact
            .get(record.fingerprint())
            .is_some_and(|entry| entry.sequence == record.sequence());

        if owned {
            self.exact.remove(record.fingerprint());
        }

        record
    }
}

/// In-memory answer cache using a linear similarity scan.
///
/// Each lookup costs O(n·d) for n records of dimension d, which is fine for
/// the few thousand questions a single deployment accumulates. Embedding calls
/// happen outside the lock and are bounded by the configured timeout.
#[derive(Debug)]
pub struct InMemoryAnswerCache {
    state: RwLock<CacheState>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: AnswerCacheConfig,
    exact_hits: AtomicU64,
    similar_hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired: AtomicU64,
}

impl InMemoryAnswerCache {
    /// Create a cache, rejecting configurations it cannot honour
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        config: AnswerCacheConfig,
    ) -> Result<Self, AnswerCacheError> {
        config.validate()?;

        let state = CacheState {
            dimensions: config.dimensions,
            ..Default::default()
        };

        Ok(Self {
            state: RwLock::new(state),
            embedder,
            config,
            exact_hits: AtomicU64::new(0),
            similar_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &AnswerCacheConfig {
        &self.config
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, CacheState>, AnswerCacheError> {
        self.state.read().map_err(|e| {
            AnswerCacheError::index_corruption(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, CacheState>, AnswerCacheError> {
        self.state.write().map_err(|e| {
            AnswerCacheError::index_corruption(format!("Failed to acquire write lock: {}", e))
        })
    }

    fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.config.ttl() else {
            return false;
        };

        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - created_at >= ttl,
            Err(_) => false,
        }
    }

    fn validate_params(params: &SimilarityParams) -> Result<(), AnswerCacheError> {
        if params.k == 0 {
            return Err(AnswerCacheError::invalid_input(
                "number of neighbors must be at least 1",
            ));
        }

        validate_threshold(params.threshold)
    }

    fn check_dimensions(
        expected: Option<usize>,
        embedding: &[f32],
    ) -> Result<(), AnswerCacheError> {
        match expected {
            Some(expected) if expected != embedding.len() => {
                Err(AnswerCacheError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Remove expired records and their exact entries; returns the count
    fn purge_locked(&self, state: &mut CacheState, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.config.ttl() else {
            return 0;
        };

        let before = state.records.len();
        let mut position = 0;

        while position < state.records.len() {
            if state.records[position].is_expired_at(ttl, now) {
                state.evict_at(position);
            } else {
                position += 1;
            }
        }

        let purged = before - state.records.len();

        if purged > 0 {
            self.expired.fetch_add(purged as u64, Ordering::Relaxed);
        }

        purged
    }

    fn miss(&self) -> Result<Option<SimilarMatch>, AnswerCacheError> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }
}

#[async_trait]
impl AnswerCache for InMemoryAnswerCache {
    async fn check_exact(&self, question: &str) -> Result<Option<String>, AnswerCacheError> {
        let fingerprint = Fingerprint::of(question)?;
        let state = self.read_state()?;

        let answer = state
            .exact
            .get(&fingerprint)
            .filter(|entry| !self.is_expired(entry.created_at, Utc::now()))
            .map(|entry| entry.answer.clone());

        if answer.is_some() {
            self.exact_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(fingerprint = %fingerprint, "Exact answer cache hit");
        }

        Ok(answer)
    }

    async fn find_similar(
        &self,
        question: &str,
        params: &SimilarityParams,
    ) -> Result<Option<SimilarMatch>, AnswerCacheError> {
        Fingerprint::of(question)?;
        Self::validate_params(params)?;

        let empty = self.read_state()?.records.is_empty();

        if empty {
            return self.miss();
        }

        let embedding = self.embed_question(question).await?;
        self.find_similar_embedded(&embedding, params).await
    }

    async fn find_similar_embedded(
        &self,
        embedding: &[f32],
        params: &SimilarityParams,
    ) -> Result<Option<SimilarMatch>, AnswerCacheError> {
        Self::validate_params(params)?;

        let state = self.read_state()?;

        if state.records.is_empty() {
            return self.miss();
        }

        Self::check_dimensions(state.dimensions, embedding)?;

        let now = Utc::now();
        let mut neighbors: Vec<(f32, &QuestionRecord)> = state
            .records
            .iter()
            .filter(|record| !self.is_expired(record.created_at(), now))
            .map(|record| (cosine_similarity(embedding, record.embedding()), record))
            .collect();

        // Highest similarity first, newest record first on ties
        neighbors.sort_by(|(a_sim, a), (b_sim, b)| {
            b_sim
                .total_cmp(a_sim)
                .then_with(|| b.sequence().cmp(&a.sequence()))
        });
        neighbors.truncate(params.k);

        let Some((similarity, record)) = neighbors
            .into_iter()
            .find(|(similarity, _)| *similarity >= params.threshold)
        else {
            return self.miss();
        };

        let indexed = state
            .exact
            .get(record.fingerprint())
            .is_some_and(|entry| entry.sequence == record.sequence());

        if !indexed {
            return Err(AnswerCacheError::index_corruption(format!(
                "Indexed record {} has no matching exact entry",
                record.id()
            )));
        }

        let found = SimilarMatch {
            record_id: record.id(),
            question: record.question().to_string(),
            answer: record.answer().to_string(),
            similarity,
        };

        self.similar_hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            similarity = found.similarity,
            threshold = params.threshold,
            matched = %found.question,
            "Similar answer cache hit"
        );

        Ok(Some(found))
    }

    async fn embed_question(&self, question: &str) -> Result<Vec<f32>, AnswerCacheError> {
        Fingerprint::of(question)?;

        let request = EmbeddingRequest::single(&self.config.embedding_model, question)
            .with_dimensions(self.config.dimensions);

        let timeout = self.config.embedding_timeout();
        let embedding = tokio::time::timeout(timeout, embed_one(self.embedder.as_ref(), request))
        .await
        .map_err(|_| {
            AnswerCacheError::embedding_unavailable(format!(
                "{} embedding timed out after {}ms",
                self.embedder.provider_name(),
                timeout.as_millis()
            ))
        })??;

        if embedding.is_empty() {
            return Err(AnswerCacheError::embedding_unavailable(
                "provider returned an empty embedding",
            ));
        }

        Ok(embedding)
    }

    async fn record(&self, question: &str, answer: &str) -> Result<(), AnswerCacheError> {
        Fingerprint::of(question)?;

        if answer.trim().is_empty() {
            return Err(AnswerCacheError::invalid_input("answer must not be empty"));
        }

        let embedding = self.embed_question(question).await?;
        self.record_with_embedding(question, answer, embedding).await
    }

    async fn record_with_embedding(
        &self,
        question: &str,
        answer: &str,
        embedding: Vec<f32>,
    ) -> Result<(), AnswerCacheError> {
        let fingerprint = Fingerprint::of(question)?;

        if answer.trim().is_empty() {
            return Err(AnswerCacheError::invalid_input("answer must not be empty"));
        }

        if embedding.is_empty() {
            return Err(AnswerCacheError::invalid_input("embedding must not be empty"));
        }

        let now = Utc::now();
        let mut state = self.write_state()?;

        Self::check_dimensions(state.dimensions, &embedding)?;
        self.purge_locked(&mut state, now);

        let replaced = state.remove_record(&fingerprint).is_some();

        if let Some(max_entries) = self.config.max_entries {
            while state.records.len() >= max_entries {
                let evicted = state.evict_at(0);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(question = %evicted.question(), "Evicted oldest cached answer");
            }
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.dimensions.get_or_insert(embedding.len());

        let record = QuestionRecord::new(fingerprint.clone(), question, answer, embedding, sequence)
            .with_created_at(now);

        state.exact.insert(
            fingerprint.clone(),
            ExactEntry {
                answer: answer.to_string(),
                sequence,
                created_at: now,
            },
        );
        state.records.push(record);

        tracing::debug!(
            fingerprint = %fingerprint,
            replaced,
            entries = state.records.len(),
            "Recorded answer"
        );

        Ok(())
    }

    fn similarity_params(&self) -> SimilarityParams {
        SimilarityParams::new(self.config.similarity_threshold).with_k(self.config.neighbors)
    }

    async fn len(&self) -> Result<usize, AnswerCacheError> {
        Ok(self.read_state()?.records.len())
    }

    async fn dimensions(&self) -> Result<Option<usize>, AnswerCacheError> {
        Ok(self.read_state()?.dimensions)
    }

    async fn clear(&self) -> Result<(), AnswerCacheError> {
        let mut state = self.write_state()?;

        *state = CacheState {
            dimensions: self.config.dimensions,
            ..Default::default()
        };

        self.exact_hits.store(0, Ordering::Relaxed);
        self.similar_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expired.store(0, Ordering::Relaxed);

        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, AnswerCacheError> {
        let mut state = self.write_state()?;
        let purged = self.purge_locked(&mut state, Utc::now());

        if purged > 0 {
            tracing::info!(purged, "Purged expired cached answers");
        }

        Ok(purged)
    }

    async fn stats(&self) -> Result<AnswerCacheStats, AnswerCacheError> {
        let state = self.read_state()?;

        Ok(AnswerCacheStats {
            entries: state.records.len(),
            exact_hits: self.exact_hits.load(Ordering::Relaxed),
            similar_hits: self.similar_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
        })
    }
}
