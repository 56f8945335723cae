//! Offline embedding provider based on hashed character trigrams
//!
//! Each word is wrapped as `#word#`, split into character trigrams, and every
//! trigram is counted in one of `dimensions` buckets chosen by 64-bit FNV-1a.
//! Vectors are L2-normalized. Lexically close questions score high; there is
//! no semantic understanding, so thresholds tuned for hosted models do not
//! transfer one to one.

use async_trait::async_trait;

use crate::domain::embedding::{
    l2_normalize, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
};
use crate::domain::DomainError;

pub const DEFAULT_HASHING_DIMENSIONS: usize = 256;

const HASHING_MODEL: &str = "hashing-trigram";
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Embed `text` into a unit vector of `dimensions` trigram buckets
pub fn trigram_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions];

    if dimensions == 0 {
        return vector;
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    for word in cleaned.split_whitespace() {
        let padded: Vec<char> = format!("#{}#", word).chars().collect();

        for gram in padded.windows(3) {
            let gram: String = gram.iter().collect();
            let bucket = (fnv1a(gram.as_bytes()) % dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
    }

    l2_normalize(&mut vector);
    vector
}

/// Deterministic, network-free embedding provider
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashingEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSIONS)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let dimensions = request.dimensions().unwrap_or(self.dimensions);

        if dimensions == 0 {
            return Err(DomainError::validation("Embedding dimensions must be positive"));
        }

        let vectors = request
            .texts()
            .iter()
            .map(|text| trigram_embedding(text, dimensions))
            .collect();

        Ok(EmbeddingResponse::new(HASHING_MODEL, vectors))
    }

    fn provider_name(&self) -> &'static str {
        "hashing"
    }

    fn default_model(&self) -> &'static str {
        HASHING_MODEL
    }

    fn dimensions(&self, _model: &str) -> Option<usize> {
        Some(self.dimensions)
    }
}
