use serde::Deserialize;

use crate::domain::answer_cache::AnswerCacheConfig;
use crate::domain::qa::{AnsweringMode, EmbeddingFailurePolicy};

const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: AnswerCacheConfig,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub quiz: QuizSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which embedding backend produces question and document vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    Openai,
    /// Offline character-trigram embeddings
    Hashing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Vector size requested from the provider; hosted models shorten
    /// their native vectors to it
    #[serde(default)]
    pub dimensions: Option<usize>,
    /// Entries kept by the embedding memo cache
    #[serde(default = "default_embedding_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_embedding_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    /// Passages answered per generated question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub on_embedding_failure: EmbeddingFailurePolicy,
    #[serde(default)]
    pub answering_mode: AnsweringMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSettings {
    /// Questions asked per quiz
    #[serde(default = "default_quiz_questions")]
    pub questions: usize,
    /// Passages a topic quiz is generated from
    #[serde(default = "default_quiz_context_documents")]
    pub context_documents: usize,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_embedding_cache_capacity() -> u64 {
    1_000
}

fn default_embedding_cache_ttl_secs() -> u64 {
    3_600
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_top_k() -> usize {
    4
}

fn default_quiz_questions() -> usize {
    10
}

fn default_quiz_context_documents() -> usize {
    5
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            base_url: None,
            api_key: None,
            dimensions: None,
            cache_capacity: default_embedding_cache_capacity(),
            cache_ttl_secs: default_embedding_cache_ttl_secs(),
        }
    }
}

impl EmbeddingSettings {
    /// Configured key, falling back to `OPENAI_API_KEY`
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref())
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: None,
            api_key: None,
            temperature: default_temperature(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl LlmSettings {
    /// Configured key, falling back to `OPENAI_API_KEY`
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref())
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            questions: default_quiz_questions(),
            context_documents: default_quiz_context_documents(),
        }
    }
}

fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    configured
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(OPENAI_API_KEY_VAR).ok())
        .filter(|key| !key.trim().is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Openai);
        assert_eq!(config.embedding.cache_capacity, 1_000);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.session.on_embedding_failure, EmbeddingFailurePolicy::Generate);
        assert_eq!(config.session.answering_mode, AnsweringMode::MapRerank);
        assert_eq!(config.quiz.questions, 10);
        assert_eq!(config.quiz.context_documents, 5);
        assert!((config.cache.similarity_threshold - 0.85).abs() < 0.001);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "cache": { "similarity_threshold": 0.9, "max_entries": 500 },
            "embedding": { "provider": "hashing", "dimensions": 128 },
            "session": { "on_embedding_failure": "abort", "answering_mode": "stuff" },
            "quiz": { "questions": 5 }
        }))
        .unwrap();

        assert!((config.cache.similarity_threshold - 0.9).abs() < 0.001);
        assert_eq!(config.cache.max_entries, Some(500));
        assert_eq!(config.cache.neighbors, 1);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
        assert_eq!(config.embedding.dimensions, Some(128));
        assert_eq!(config.embedding.cache_ttl_secs, 3_600);
        assert_eq!(config.session.on_embedding_failure, EmbeddingFailurePolicy::Abort);
        assert_eq!(config.session.answering_mode, AnsweringMode::Stuff);
        assert_eq!(config.quiz.questions, 5);
        assert_eq!(config.quiz.context_documents, 5);
        assert_eq!(config.llm.timeout_secs, 60);
    }

    #[test]
    fn test_configured_api_key_wins() {
        let settings = LlmSettings {
            api_key: Some("sk-configured".to_string()),
            ..Default::default()
        };

        assert_eq!(settings.resolved_api_key().as_deref(), Some("sk-configured"));
    }
}
