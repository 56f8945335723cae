//! Streamed chat completions

use std::pin::Pin;

use futures::{Stream, StreamExt};

use super::FinishReason;
use crate::domain::DomainError;

/// One increment of a streamed completion
#[derive(Debug, Clone, PartialEq)]
pub struct ChatDelta {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

impl ChatDelta {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
        }
    }

    pub fn finished(reason: FinishReason) -> Self {
        Self {
            text: String::new(),
            finish_reason: Some(reason),
        }
    }
}

pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatDelta, DomainError>> + Send>>;

/// Drain a stream, handing every non-empty delta to `on_token`, and return
/// the concatenated text
pub async fn forward_stream(
    mut stream: ChatStream,
    on_token: &mut (dyn FnMut(&str) + Send),
) -> Result<String, DomainError> {
    let mut text = String::new();

    while let Some(delta) = stream.next().await {
        let delta = delta?;

        if !delta.text.is_empty() {
            on_token(&delta.text);
            text.push_str(&delta.text);
        }
    }

    Ok(text)
}
