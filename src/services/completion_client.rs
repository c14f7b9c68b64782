use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Text-completion backend. Output is untrusted free text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[derive(Deserialize)]
struct RespChoiceMsg {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RespChoice {
    message: RespChoiceMsg,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<RespChoice>,
}

/// OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(model = %request.model, "sending completion request");
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(self.timeout.as_secs())
                } else {
                    Error::Reqwest(e)
                }
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("API error {}: {}", status, text)));
        }

        let body: Resp = res.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Upstream("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value as JsonValue};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> OpenAiClient {
        OpenAiClient::new(
            "sk-test".to_string(),
            base_url,
            Client::new(),
            Duration::from_secs(5),
        )
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system("You write exam questions."),
                ChatMessage::user("Generate 1 question on Optics."),
            ],
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: 256,
            top_p: 0.9,
        }
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<JsonValue>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer sk-test");
                if !authorized || body["model"] != "test-model" || body["max_tokens"] != 256 {
                    return (StatusCode::BAD_REQUEST, Json(json!({"error": "unexpected request"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "choices": [
                            {"message": {"role": "assistant", "content": "{\"questions\": []}"}},
                            {"message": {"role": "assistant", "content": "second"}}
                        ]
                    })),
                )
            }),
        );
        let base_url = serve(router).await;

        // Trailing slash on the base URL is tolerated.
        let text = client_for(format!("{}/", base_url))
            .complete(request())
            .await
            .unwrap();
        assert_eq!(text, "{\"questions\": []}");
    }

    #[tokio::test]
    async fn empty_choices_is_an_upstream_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let err = client_for(serve(router).await)
            .complete(request())
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Upstream(msg) if msg == "empty completion"));
    }

    #[tokio::test]
    async fn blank_content_is_an_upstream_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"choices": [{"message": {"content": "   "}}]})) }),
        );
        let err = client_for(serve(router).await)
            .complete(request())
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Upstream(msg) if msg == "empty completion"));
    }

    #[tokio::test]
    async fn server_error_carries_status_and_body() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
        );
        let err = client_for(serve(router).await)
            .complete(request())
            .await
            .unwrap_err();
        match err {
            Error::Upstream(msg) => {
                assert_eq!(msg, "API error 500 Internal Server Error: model overloaded")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
