//! Chat completions against an OpenAI-compatible `/v1/chat/completions`

use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use serde::{Deserialize, Serialize};

use super::endpoint::OpenAiEndpoint;
use super::http_client::HttpClientTrait;
use crate::domain::llm::{
    ChatDelta, ChatStream, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, Usage,
};
use crate::domain::DomainError;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    endpoint: OpenAiEndpoint,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, endpoint: OpenAiEndpoint) -> Self {
        Self { client, endpoint }
    }

    fn body(model: &str, request: &LlmRequest, stream: bool) -> Result<serde_json::Value, DomainError> {
        let body = ChatCompletionBody {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            stream,
        };

        serde_json::to_value(body)
            .map_err(|e| DomainError::provider("openai", format!("Failed to encode request: {}", e)))
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        tracing::debug!(model, messages = request.messages.len(), "Sending chat completion");

        let body = Self::body(model, &request, false)?;
        let json = self
            .client
            .post_json(&self.endpoint.url(CHAT_COMPLETIONS_PATH), self.endpoint.headers(), &body)
            .await?;

        let completion: ChatCompletion = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;
        completion.into_response()
    }

    async fn chat_stream(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<ChatStream, DomainError> {
        tracing::debug!(model, messages = request.messages.len(), "Streaming chat completion");

        let body = Self::body(model, &request, true)?;
        let bytes = self
            .client
            .post_json_stream(&self.endpoint.url(CHAT_COMPLETIONS_PATH), self.endpoint.headers(), &body)
            .await?;

        let deltas = bytes
            .scan(SseDecoder::default(), |decoder, chunk: Result<Bytes, DomainError>| {
                let items: Vec<Result<ChatDelta, DomainError>> = match chunk {
                    Ok(chunk) => decoder.feed(&chunk).iter().filter_map(|data| parse_delta(data)).collect(),
                    Err(e) => vec![Err(e)],
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten();

        Ok(Box::pin(deltas))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Splits a server-sent event body into `data:` payloads.
///
/// Network chunks may end mid-line, so the unfinished tail is kept for the
/// next call.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let Some(end) = self.buffer.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let complete: Vec<u8> = self.buffer.drain(..=end).collect();

        String::from_utf8_lossy(&complete)
            .lines()
            .filter_map(|line| line.trim_end_matches('\r').strip_prefix("data:"))
            .map(|data| data.trim().to_string())
            .filter(|data| !data.is_empty())
            .collect()
    }
}

/// `None` for the terminal `[DONE]` marker and for chunks without choices
fn parse_delta(data: &str) -> Option<Result<ChatDelta, DomainError>> {
    if data == "[DONE]" {
        return None;
    }

    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(DomainError::provider(
                "openai",
                format!("Malformed stream chunk: {}", e),
            )))
        }
    };

    let choice = chunk.choices.into_iter().next()?;
    Some(Ok(ChatDelta {
        text: choice.delta.content.unwrap_or_default(),
        finish_reason: choice.finish_reason.as_deref().map(FinishReason::from),
    }))
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletion {
    id: String,
    model: String,
    choices: Vec<CompletionChoice>,
    usage: Option<CompletionUsage>,
}

impl ChatCompletion {
    fn into_response(self) -> Result<LlmResponse, DomainError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        let mut response =
            LlmResponse::new(self.id, self.model, choice.message.content.unwrap_or_default());
        response.finish_reason = choice.finish_reason.as_deref().map(FinishReason::from);
        response.usage = self.usage.map(|usage| Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        });

        Ok(response)
    }
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::forward_stream;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    fn provider(client: MockHttpClient) -> OpenAiProvider<MockHttpClient> {
        OpenAiProvider::new(client, OpenAiEndpoint::new("test-api-key", None))
    }

    fn completion(id: &str, content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18 }
        })
    }

    #[tokio::test]
    async fn test_chat_sends_typed_body() {
        let provider = provider(
            MockHttpClient::new()
                .with_response(TEST_URL, completion("chatcmpl-123", "It is a proxy for AI requests.")),
        );

        let request = LlmRequest::default()
            .system("Be brief.")
            .user("What is AI Gateway?")
            .with_temperature(0.1);
        let response = provider.chat("gpt-4o-mini", request).await.unwrap();

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.content(), "It is a proxy for AI requests.");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.map(|u| u.total()), Some(18));

        let body = &provider.client.bodies()[0];
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "What is AI Gateway?");
        assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 0.001);
        assert!(body.get("stream").is_none());
    }

    #[tokio::test]
    async fn test_chat_errors() {
        let failing = provider(MockHttpClient::new().with_error(TEST_URL, "API key invalid"));
        assert!(failing
            .chat("gpt-4o-mini", LlmRequest::default().user("Hello!"))
            .await
            .is_err());

        let empty = provider(MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({"id": "x", "model": "m", "choices": []}),
        ));
        let result = empty.chat("m", LlmRequest::default().user("hi")).await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_chat_stream_reassembles_split_events() {
        let provider = provider(MockHttpClient::new().with_stream(
            TEST_URL,
            vec![
                "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"finish_reason\":null}]}\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"It is \"},\"finish_reason\":null}]}\n\ndata: {\"choi",
                "ces\":[{\"delta\":{\"content\":\"a proxy.\"},\"finish_reason\":null}]}\n\n",
                "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
                "data: [DONE]\n\n",
            ],
        ));

        let stream = provider
            .chat_stream("gpt-4o-mini", LlmRequest::default().user("What is AI Gateway?"))
            .await
            .unwrap();
        let mut tokens = Vec::new();
        let text = forward_stream(stream, &mut |token: &str| tokens.push(token.to_string()))
            .await
            .unwrap();

        assert_eq!(text, "It is a proxy.");
        assert_eq!(tokens, vec!["It is ", "a proxy."]);
        assert_eq!(provider.client.bodies()[0]["stream"], true);
    }

    #[tokio::test]
    async fn test_chat_stream_malformed_chunk() {
        let provider = provider(
            MockHttpClient::new().with_stream(TEST_URL, vec!["data: {not json}\n\n"]),
        );

        let stream = provider
            .chat_stream("gpt-4o-mini", LlmRequest::default().user("hi"))
            .await
            .unwrap();
        let result = forward_stream(stream, &mut |_: &str| {}).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[test]
    fn test_sse_decoder_keeps_partial_lines() {
        let mut decoder = SseDecoder::default();

        assert!(decoder.feed(b"data: {\"a\"").is_empty());
        assert_eq!(decoder.feed(b":1}\r\n\r\n: keep-alive\n"), vec!["{\"a\":1}"]);
        assert_eq!(decoder.feed(b"data: [DONE]\n"), vec!["[DONE]"]);
    }
}
