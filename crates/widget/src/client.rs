//! HTTP client for the gateway's `/askAssistant` endpoint

use crate::errors::ClientError;
use assistant_common::errors::ErrorResponse;
use assistant_common::{AskRequest, AskResponse};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sends one question to the assistant.
///
/// Implementations must return [`ClientError::AbortedByUser`] promptly once
/// `cancel` fires and must not retry.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn ask(
        &self,
        request: &AskRequest,
        cancel: CancellationToken,
    ) -> Result<AskResponse, ClientError>;
}

/// reqwest-backed client
#[derive(Clone)]
pub struct HttpAssistantClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAssistantClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    async fn send(&self, request: &AskRequest) -> Result<AskResponse, ClientError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Gateway errors carry { message, error? }; anything else is opaque
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| match body.error {
                    Some(cause) => format!("{} ({})", body.message, cause),
                    None => body.message,
                })
                .unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<AskResponse>().await?)
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn ask(
        &self,
        request: &AskRequest,
        cancel: CancellationToken,
    ) -> Result<AskResponse, ClientError> {
        // Dropping the in-flight future closes the connection
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::AbortedByUser),
            result = self.send(request) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_common::{HistoryEntry, Locale, ResponseStatus};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpAssistantClient {
        HttpAssistantClient::new(format!("{}/askAssistant", server.uri()), None).unwrap()
    }

    #[tokio::test]
    async fn test_posts_request_and_parses_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/askAssistant"))
            .and(body_json(json!({
                "question": "What is Vision?",
                "history": [["Hi", "Hello"]],
                "locale": "hr"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assistantMessage": "Vision je platforma.",
                "status": "DONE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = AskRequest::new(
            "What is Vision?",
            vec![HistoryEntry::new("Hi", "Hello")],
            Locale::Hr,
        );
        let response = client_for(&server)
            .ask(&request, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.assistant_message, "Vision je platforma.");
        assert_eq!(response.status, ResponseStatus::Done);
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "message": "Error getting embedding",
                "error": "quota exceeded"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .ask(&AskRequest::new("q", vec![], Locale::EnUs), CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Error getting embedding (quota exceeded)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "assistantMessage": "late", "status": "DONE" }))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = client
            .ask(&AskRequest::new("q", vec![], Locale::EnUs), token)
            .await
            .unwrap_err();
        assert!(err.is_aborted());
    }
}
