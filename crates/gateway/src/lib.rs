//! Vision Assistant API Gateway
//!
//! Serves the chat widget's single endpoint over the answer pipeline.
//! Handles:
//! - Request routing (`POST /askAssistant`, health probes)
//! - Method and body validation
//! - Observability (request tracing, request ids, metrics)

pub mod handlers;

use assistant_common::{
    completion::create_chat_model,
    config::AppConfig,
    embeddings::create_embedder,
    errors::{AppError, Result},
    retrieval::create_vector_index,
    Orchestrator,
};
use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: AppConfig, orchestrator: Orchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
        }
    }

    /// Build provider clients from configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let embedder = create_embedder(&config.embedding)?;
        let index = create_vector_index(&config.vector_index)?;
        let model = create_chat_model(&config.completion)?;

        let orchestrator =
            Orchestrator::new(embedder, index, model).with_top_k(config.vector_index.top_k);

        Ok(Self::new(config, orchestrator))
    }

    pub fn request_timeout(&self) -> Duration {
        self.config.request_timeout()
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Timeouts surface as the usual JSON error envelope
    let timeout = state.request_timeout();
    let seconds = timeout.as_secs();
    let timeout_layer = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(move |err: BoxError| async move {
            middleware_error(err, seconds)
        }))
        .timeout(timeout);

    let ask = post(handlers::ask::ask_assistant).fallback(handlers::ask::method_not_supported);

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Chat endpoint; /api prefix kept for widgets embedded under a web app
        .route("/askAssistant", ask.clone())
        .route("/api/askAssistant", ask)

        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer)
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

fn middleware_error(err: BoxError, seconds: u64) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout { seconds }
    } else {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}
