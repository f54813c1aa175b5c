//! Answer pipeline: embed → retrieve → generate
//!
//! Each request makes three sequential provider calls. Any failure
//! short-circuits into an [`AppError::Upstream`]; nothing is retried.

use crate::completion::ChatModel;
use crate::context::{build_system_prompt, sanitize_question, stitch};
use crate::embeddings::Embedder;
use crate::errors::{AppError, Result, UpstreamStage};
use crate::metrics;
use crate::retrieval::VectorIndex;
use crate::types::{AskRequest, AskResponse};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Message returned when the question is missing or blank
pub const MISSING_QUESTION: &str = "No question in the request";

/// Orchestrates one question through the provider chain
#[derive(Clone)]
pub struct Orchestrator {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
}

impl Orchestrator {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
            top_k: crate::DEFAULT_TOP_K,
        }
    }

    /// Override the number of chunks requested from the index
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a question
    pub async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        let question = match request.question.as_deref().map(sanitize_question) {
            Some(q) if !q.is_empty() => q,
            _ => return Err(AppError::invalid_request(MISSING_QUESTION)),
        };

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "ask",
            %request_id,
            locale = %request.locale,
            history = request.history.len()
        );

        async move {
            let start = Instant::now();

            let embedding = timed(UpstreamStage::Embedding, self.embedder.embed(&question)).await?;
            tracing::debug!(dimension = embedding.len(), "Question embedded");

            let chunks = timed(
                UpstreamStage::Retrieval,
                self.index.query(&embedding, self.top_k),
            )
            .await?;
            metrics::record_context(chunks.len());
            tracing::debug!(chunks = chunks.len(), index = self.index.name(), "Context retrieved");

            let context = stitch(&chunks);
            let system = build_system_prompt(request.locale, &context, &request.history);

            let answer = timed(UpstreamStage::Generation, self.model.complete(&system, &question)).await?;
            metrics::record_answer(request.locale.as_str());

            tracing::info!(
                chunks = chunks.len(),
                answer_len = answer.len(),
                latency_ms = start.elapsed().as_millis() as u64,
                "Answer generated"
            );

            Ok::<_, AppError>(AskResponse::done(answer))
        }
        .instrument(span)
        .await
    }
}

/// Await one provider call, recording its latency and outcome
async fn timed<T, F>(stage: UpstreamStage, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = call.await;
    metrics::record_upstream(stage, start.elapsed().as_secs_f64(), result.is_ok());

    if let Err(e) = &result {
        tracing::error!(stage = %stage, error = %e, "Upstream call failed");
    }
    result
}
