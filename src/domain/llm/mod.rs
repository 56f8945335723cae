//! Chat-completion provider domain models and traits

mod message;
mod provider;
mod request;
mod response;
mod stream;

pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::LlmRequest;
pub use response::{FinishReason, LlmResponse, Usage};
pub use stream::{forward_stream, ChatDelta, ChatStream};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
