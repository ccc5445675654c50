//! Client for an OpenAI-compatible chat-completions API.
//!
//! One non-streaming `POST {base}/v1/chat/completions` per call, carrying a
//! bearer credential, the configured model name, and the ordered message
//! list. The response's `id` and `created` fields become the persisted
//! assistant message's identifier and timestamp.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ServerError;

/// One turn of conversation as the upstream API sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `"user"`, `"assistant"`, or `"system"`.
    pub role: String,
    pub content: String,
}

/// The assistant reply extracted from a successful upstream response.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Upstream response id, e.g. `"chatcmpl-…"`.
    pub id: String,
    /// Unix timestamp reported by the upstream API.
    pub created: i64,
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatTurn,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    id: String,
    created: i64,
    choices: Vec<CompletionChoice>,
}

#[derive(Debug)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(cfg: &Config) -> Self {
        Self::with_base_url(
            cfg.upstream_url.clone(),
            cfg.upstream_api_key.clone(),
            cfg.model.clone(),
        )
    }

    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            http: reqwest::Client::new(),
        }
    }

    /// Request the next assistant message for `messages`.
    ///
    /// Any transport failure, non-2xx status, or unexpected response shape
    /// becomes [`ServerError::Upstream`]; there is no retry.
    pub async fn complete(&self, messages: &[ChatTurn]) -> Result<Completion, ServerError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ServerError::Upstream(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ServerError::Upstream(format!(
                "completions API returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ServerError::Upstream(format!("malformed response: {e}")))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServerError::Upstream("response contained no choices".into()))?;

        Ok(Completion {
            id: body.id,
            created: body.created,
            role: choice.message.role,
            content: choice.message.content,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn client(url: &str) -> OpenAiClient {
        OpenAiClient::with_base_url(url.to_owned(), "abc".into(), "test-model".into())
    }

    fn turns() -> Vec<ChatTurn> {
        vec![
            ChatTurn {
                role: "assistant".into(),
                content: "How may I help you?".into(),
            },
            ChatTurn {
                role: "user".into(),
                content: "Say hi to the world".into(),
            },
        ]
    }

    #[tokio::test]
    async fn it_extracts_the_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("Authorization", "Bearer abc")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "model": "test-model",
                "messages": [
                    { "role": "assistant", "content": "How may I help you?" },
                    { "role": "user", "content": "Say hi to the world" },
                ],
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "id": "chatcmpl-123",
                    "object": "chat.completion",
                    "created": 1700000000,
                    "model": "test-model",
                    "choices": [{
                        "index": 0,
                        "message": { "role": "assistant", "content": "Hello world!" },
                        "finish_reason": "stop",
                    }],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let completion = client(&server.url()).complete(&turns()).await.unwrap();
        mock.assert_async().await;

        assert_eq!(completion.id, "chatcmpl-123");
        assert_eq!(completion.created, 1700000000);
        assert_eq!(completion.role, "assistant");
        assert_eq!(completion.content, "Hello world!");
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let err = client(&server.url()).complete(&turns()).await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, ServerError::Upstream(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_an_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(
                serde_json::json!({ "id": "chatcmpl-1", "created": 1, "choices": [] })
                    .to_string(),
            )
            .create_async()
            .await;

        let err = client(&server.url()).complete(&turns()).await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, ServerError::Upstream(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_an_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server.url()).complete(&turns()).await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, ServerError::Upstream(_)));
    }
}
