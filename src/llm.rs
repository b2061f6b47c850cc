use async_trait::async_trait;
use serde::Serialize;
use reqwest::Client;
use tracing::debug;

use crate::error::{AppError, Result, error_chain};
use crate::pipeline::{Document, Summarizer};

/// The one hosted model every summary is requested from.
pub const MODEL: &str = "llama3-8b-8192";

pub const SUMMARY_PROMPT: &str = "Summarize the following content in Points and about 1000 words:\n{text}";

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<Message>,
}

/// Stuffs the whole document into the fixed prompt; no chunking.
pub fn build_prompt(document: &Document) -> String {
    SUMMARY_PROMPT.replace("{text}", &document.page_content)
}

/// Chat-completions client for Groq's OpenAI-compatible endpoint.
pub struct GroqSummarizer {
    client: Client,
    api_base: String,
}

impl GroqSummarizer {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    async fn summarize(&self, api_key: &str, document: &Document) -> Result<String> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                Message {
                    role: "user".into(),
                    content: build_prompt(document),
                }
            ],
        };

        debug!(model = MODEL, "Calling chat completions");
        let res = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmError(error_chain(&e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::LlmError(format!("API returned {status}: {body}")));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::LlmError(error_chain(&e)))?;
        extract_reply(&json)
    }
}

fn extract_reply(json: &serde_json::Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::State, http::{HeaderMap, StatusCode}, routing::post};
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn chat_completions(
        State(received): State<Received>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, String) {
        received.lock().unwrap().push(body);
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer gsk_valid") => (
                StatusCode::OK,
                serde_json::json!({
                    "choices": [ { "message": { "role": "assistant", "content": "- pt" } } ]
                })
                .to_string(),
            ),
            _ => (StatusCode::UNAUTHORIZED, "invalid_api_key".to_string()),
        }
    }

    /// Local stand-in for the Groq endpoint; returns its `/v1` base URL.
    async fn serve_chat_api() -> (String, Received) {
        let received = Received::default();
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(received.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}/v1"), received)
    }

    #[tokio::test]
    async fn test_summarize_sends_one_prompt_to_fixed_model() {
        let (base, received) = serve_chat_api().await;
        let summary = GroqSummarizer::new(base)
            .summarize("gsk_valid", &Document::new("Hello world"))
            .await
            .unwrap();
        assert_eq!(summary, "- pt");

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0],
            serde_json::json!({
                "model": "llama3-8b-8192",
                "messages": [{
                    "role": "user",
                    "content": "Summarize the following content in Points and about 1000 words:\nHello world"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_summarize_rejected_key_reports_status_and_body() {
        let (base, _) = serve_chat_api().await;
        let err = GroqSummarizer::new(base)
            .summarize("gsk_revoked", &Document::new("Hello world"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LlmError(_)));
        assert_eq!(
            err.to_string(),
            "LLM processing error: API returned 401 Unauthorized: invalid_api_key"
        );
    }

    #[test]
    fn test_build_prompt_inserts_text_verbatim() {
        let doc = Document::new("Hello world");
        assert_eq!(
            build_prompt(&doc),
            "Summarize the following content in Points and about 1000 words:\nHello world"
        );
    }

    #[test]
    fn test_build_prompt_does_not_truncate() {
        let long = "word ".repeat(50_000);
        let prompt = build_prompt(&Document::new(long.clone()));
        assert!(prompt.ends_with(&long));
    }

    #[test]
    fn test_extract_reply() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "- point one\n- point two" } }
            ]
        });
        assert_eq!(extract_reply(&json).unwrap(), "- point one\n- point two");
    }

    #[test]
    fn test_extract_reply_missing_choices() {
        let json = serde_json::json!({ "choices": [] });
        assert!(matches!(extract_reply(&json), Err(AppError::LlmError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_llm_error() {
        let summarizer = GroqSummarizer::new("http://127.0.0.1:1/v1");
        let err = summarizer
            .summarize("gsk_test", &Document::new("text"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "LlmError");
        assert!(err.to_string().contains("error sending request"), "{err}");
    }
}
