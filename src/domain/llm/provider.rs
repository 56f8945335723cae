use async_trait::async_trait;
use std::fmt::Debug;

use super::{ChatStream, LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Send a chat completion request and receive the answer as it is generated
    async fn chat_stream(&self, model: &str, request: LlmRequest)
    -> Result<ChatStream, DomainError>;

    fn provider_name(&self) -> &'static str;
}
