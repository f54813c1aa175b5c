//! Chat completion client
//!
//! Sends a system prompt and the user's question to an OpenAI-compatible
//! `/chat/completions` endpoint and returns the first choice's text.

use crate::config::CompletionConfig;
use crate::errors::{AppError, Result, UpstreamStage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Trait for chat completion models
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Answer `user` under the instructions in `system`.
    /// A response without choices yields an empty string.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat completion client
pub struct OpenAIChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    endpoint: String,
}

impl OpenAIChatModel {
    /// Create a new completion client
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| AppError::Configuration {
            message: "OpenAI API key required for completions".to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        let base = config
            .api_base
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
            .trim_end_matches('/');

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            endpoint: format!("{}/chat/completions", base),
        })
    }
}

fn failed(message: String) -> AppError {
    AppError::upstream(UpstreamStage::Generation, message)
}

fn caused_by(context: &str, source: reqwest::Error) -> AppError {
    AppError::upstream_caused_by(UpstreamStage::Generation, context, source)
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
        };

        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| caused_by("LLM API request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("LLM API error {}: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| caused_by("Failed to parse LLM response", e))?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Model that restates the question, for offline development
pub struct MockChatModel;

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, _system: &str, user: &str) -> Result<String> {
        Ok(format!(
            "You asked: \"{}\". [Mock response - completion provider not configured]",
            user
        ))
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}

/// Create a chat model based on configuration
pub fn create_chat_model(config: &CompletionConfig) -> Result<Arc<dyn ChatModel>> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAIChatModel::new(config)?)),
        "mock" => Ok(Arc::new(MockChatModel)),
        other => Err(AppError::Configuration {
            message: format!("Unknown completion provider: {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer) -> OpenAIChatModel {
        OpenAIChatModel::new(&CompletionConfig {
            api_key: Some("sk-test".into()),
            api_base: Some(server.uri()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_request_shape_and_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "What is Vision?" }
                ],
                "temperature": 0.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Vision is a platform." } },
                    { "message": { "role": "assistant", "content": "ignored" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = model_for(&server).complete("be brief", "What is Vision?").await.unwrap();
        assert_eq!(answer, "Vision is a platform.");
    }

    #[tokio::test]
    async fn test_missing_choice_defaults_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let answer = model_for(&server).complete("s", "q").await.unwrap();
        assert_eq!(answer, "");
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = model_for(&server).complete("s", "q").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream { stage: UpstreamStage::Generation, .. }
        ));
    }
}
