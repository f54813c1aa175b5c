//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub providers: ProviderChecks,
}

#[derive(Serialize)]
pub struct ProviderChecks {
    pub embedding: ProviderInfo,
    pub vector_index: ProviderInfo,
    pub completion: ProviderInfo,
}

#[derive(Serialize)]
pub struct ProviderInfo {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub configured: bool,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Readiness probe - reports provider configuration without calling providers
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let config = &state.config;

    let embedding = ProviderInfo {
        provider: config.embedding.provider.clone(),
        model: Some(config.embedding.model.clone()),
        configured: config.embedding.provider == "mock" || config.embedding.api_key.is_some(),
    };

    let vector_index = ProviderInfo {
        provider: config.vector_index.provider.clone(),
        model: None,
        configured: config.vector_index.provider == "mock"
            || (config.vector_index.api_key.is_some() && config.vector_index.query_url().is_ok()),
    };

    let completion = ProviderInfo {
        provider: config.completion.provider.clone(),
        model: Some(config.completion.model.clone()),
        configured: config.completion.provider == "mock" || config.completion.api_key.is_some(),
    };

    let all_ready = embedding.configured && vector_index.configured && completion.configured;

    Json(ReadyResponse {
        status: if all_ready { "ready" } else { "not_ready" }.to_string(),
        providers: ProviderChecks {
            embedding,
            vector_index,
            completion,
        },
    })
}
