//! Vector index retrieval
//!
//! Queries a similarity index for the text chunks nearest to a query
//! embedding. The production index speaks the Pinecone `/query` protocol.

use crate::config::VectorIndexConfig;
use crate::errors::{AppError, Result, UpstreamStage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Retrieved chunk of a support document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk text
    pub text: String,

    /// Similarity score reported by the index, if any
    pub score: Option<f32>,
}

/// Common trait for similarity indexes
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` chunks nearest to `embedding`, best match first
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Name used in logs and metrics
    fn name(&self) -> &str;
}

/// Pinecone index client
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    query_url: String,
    namespace: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    text: Option<String>,
}

impl PineconeIndex {
    /// Create a new index client from configuration
    pub fn new(config: &VectorIndexConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| AppError::Configuration {
            message: "Pinecone API key required".to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            query_url: config.query_url()?,
            namespace: config.namespace.clone(),
        })
    }
}

fn failed(message: String) -> AppError {
    AppError::upstream(UpstreamStage::Retrieval, message)
}

fn caused_by(context: &str, source: reqwest::Error) -> AppError {
    AppError::upstream_caused_by(UpstreamStage::Retrieval, context, source)
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let request = QueryRequest {
            vector: embedding,
            top_k,
            include_metadata: true,
            namespace: &self.namespace,
        };

        let response = self.client
            .post(&self.query_url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| caused_by("Request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("API error {}: {}", status, body)));
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| caused_by("Failed to parse response", e))?;

        let chunks = result
            .matches
            .into_iter()
            .filter_map(|m| {
                let text = m.metadata.and_then(|meta| meta.text)?;
                Some(RetrievedChunk { text, score: m.score })
            })
            .take(top_k)
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}

/// Index returning a fixed set of chunks, for offline development
pub struct MockVectorIndex {
    chunks: Vec<RetrievedChunk>,
}

impl MockVectorIndex {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            chunks: texts
                .into_iter()
                .map(|text| RetrievedChunk { text, score: None })
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { chunks: Vec::new() }
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn query(&self, _embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        Ok(self.chunks.iter().take(top_k).cloned().collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Create a vector index client based on configuration
pub fn create_vector_index(config: &VectorIndexConfig) -> Result<Arc<dyn VectorIndex>> {
    match config.provider.as_str() {
        "pinecone" => Ok(Arc::new(PineconeIndex::new(config)?)),
        "mock" => Ok(Arc::new(MockVectorIndex::empty())),
        other => Err(AppError::Configuration {
            message: format!("Unknown vector index provider: {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index_for(server: &MockServer) -> PineconeIndex {
        PineconeIndex::new(&VectorIndexConfig {
            api_key: Some("pc-key".into()),
            host: Some(server.uri()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_query_request_shape_and_parsing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("Api-Key", "pc-key"))
            .and(body_json(json!({
                "vector": [0.5, 0.25],
                "topK": 3,
                "includeMetadata": true,
                "namespace": "vision"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    { "id": "a", "score": 0.91, "metadata": { "text": "Vision overview" } },
                    { "id": "b", "score": 0.80, "metadata": {} },
                    { "id": "c", "score": 0.72, "metadata": { "text": "User management" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let chunks = index_for(&server).query(&[0.5, 0.25], 3).await.unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Vision overview", "User management"]);
        assert_eq!(chunks[0].score, Some(0.91));
    }

    #[tokio::test]
    async fn test_missing_matches_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let chunks = index_for(&server).query(&[1.0], 3).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = index_for(&server).query(&[1.0], 3).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream { stage: UpstreamStage::Retrieval, .. }
        ));
    }

    #[tokio::test]
    async fn test_mock_index_respects_top_k() {
        let index = MockVectorIndex::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert_eq!(index.query(&[], 3).await.unwrap().len(), 3);
    }
}
