//! Error types for the assistant services
//!
//! Provides:
//! - Distinct error types for client mistakes and upstream failures
//! - HTTP status code mapping
//! - The `{ message, error }` JSON envelope the widget expects
//! - Error codes for log correlation

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request errors (1xxx)
    InvalidRequest,
    MethodNotAllowed,

    // External service errors (8xxx)
    EmbeddingError,
    RetrievalError,
    GenerationError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    RequestTimeout,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::InvalidRequest => 1001,
            ErrorCode::MethodNotAllowed => 1002,

            ErrorCode::EmbeddingError => 8001,
            ErrorCode::RetrievalError => 8002,
            ErrorCode::GenerationError => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::RequestTimeout => 9003,
        }
    }
}

/// The outbound call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStage {
    Embedding,
    Retrieval,
    Generation,
}

impl UpstreamStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamStage::Embedding => "embedding",
            UpstreamStage::Retrieval => "retrieval",
            UpstreamStage::Generation => "generation",
        }
    }

    /// Message returned to the caller; the cause travels separately
    pub fn public_message(&self) -> &'static str {
        match self {
            UpstreamStage::Embedding => "Error getting embedding",
            UpstreamStage::Retrieval => "Error querying vectorstore",
            UpstreamStage::Generation => "Error occured in model processing",
        }
    }
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Method not supported")]
    MethodNotAllowed,

    #[error("{stage} call failed: {message}")]
    Upstream {
        stage: UpstreamStage,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("No answer within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn upstream(stage: UpstreamStage, message: impl Into<String>) -> Self {
        AppError::Upstream {
            stage,
            message: message.into(),
            source: None,
        }
    }

    /// Upstream failure that keeps the underlying error as its source
    pub fn upstream_caused_by(
        stage: UpstreamStage,
        context: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Upstream {
            stage,
            message: format!("{}: {}", context, source),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            AppError::MethodNotAllowed => ErrorCode::MethodNotAllowed,
            AppError::Upstream { stage, .. } => match stage {
                UpstreamStage::Embedding => ErrorCode::EmbeddingError,
                UpstreamStage::Retrieval => ErrorCode::RetrievalError,
                UpstreamStage::Generation => ErrorCode::GenerationError,
            },
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Timeout { .. } => ErrorCode::RequestTimeout,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. }
            | AppError::Timeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert into the response envelope
    pub fn to_body(&self) -> ErrorResponse {
        match self {
            AppError::Upstream { stage, message, .. } => ErrorResponse {
                message: stage.public_message().to_string(),
                error: Some(message.clone()),
            },
            AppError::Timeout { .. } => ErrorResponse {
                message: "Request timed out".to_string(),
                error: Some(self.to_string()),
            },
            AppError::Configuration { .. } | AppError::Internal { .. } => ErrorResponse {
                message: "Internal server error".to_string(),
                error: Some(self.to_string()),
            },
            _ => ErrorResponse {
                message: self.to_string(),
                error: None,
            },
        }
    }
}

/// Error envelope returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = code.as_code(),
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %self,
                code = code.as_code(),
                status = status.as_u16(),
                "Client error"
            );
        }

        (status, Json(self.to_body())).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}
