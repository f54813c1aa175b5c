//! Chat endpoint handlers

use axum::{body::Bytes, extract::State, http::Method, Json};

use crate::AppState;
use assistant_common::{
    errors::{AppError, Result},
    metrics::RequestMetrics,
    AskRequest, AskResponse,
};

/// Answer one question
///
/// The body is parsed as JSON whatever its `Content-Type`.
///
/// Client cancellation is not propagated: if the caller disconnects, the
/// upstream calls already in flight still run to completion.
pub async fn ask_assistant(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AskResponse>> {
    let metrics = RequestMetrics::start("/askAssistant");

    let result = match serde_json::from_slice::<AskRequest>(&body) {
        Ok(request) => state.orchestrator.ask(request).await,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected request body");
            Err(AppError::invalid_request("Invalid request body"))
        }
    };

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    };
    metrics.finish(status);

    result.map(Json)
}

/// Any method other than POST
pub async fn method_not_supported(method: Method) -> AppError {
    tracing::info!(%method, "Unsupported method");
    AppError::MethodNotAllowed
}
