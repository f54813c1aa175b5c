//! Configuration management for the assistant services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Provider variables (OPENAI_API_KEY, PINECONE_*) as defaults
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use crate::errors::{AppError, Result};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider variables that seed config keys when present.
/// APP__ variables and config files still take precedence.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("embedding.api_key", "OPENAI_API_KEY"),
    ("completion.api_key", "OPENAI_API_KEY"),
    ("vector_index.api_key", "PINECONE_API_KEY"),
    ("vector_index.environment", "PINECONE_ENVIRONMENT"),
    ("vector_index.index_name", "PINECONE_INDEX_NAME"),
];

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Deployment environment (development, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index configuration
    #[serde(default)]
    pub vector_index: VectorIndexConfig,

    /// Chat completion configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whole-request timeout in seconds; must exceed the three sequential upstream timeouts
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: openai, mock
    #[serde(default = "default_openai_provider")]
    pub provider: String,

    /// API key for embedding service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorIndexConfig {
    /// Vector index provider: pinecone, mock
    #[serde(default = "default_index_provider")]
    pub provider: String,

    /// API key for the index
    pub api_key: Option<String>,

    /// Pinecone environment (e.g. us-west1-gcp)
    pub environment: Option<String>,

    /// Index name
    pub index_name: Option<String>,

    /// Project id segment of the index host
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Full query host, overrides the derived one
    pub host: Option<String>,

    /// Namespace holding the support documents
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Number of nearest neighbours to request
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompletionConfig {
    /// Completion provider: openai, mock
    #[serde(default = "default_openai_provider")]
    pub provider: String,

    /// API key for the completion service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Minimum log level; derived from the environment when unset
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

// Default value functions
fn default_environment() -> String { "development".to_string() }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_request_timeout() -> u64 { 100 }
fn default_openai_provider() -> String { "openai".to_string() }
fn default_index_provider() -> String { "pinecone".to_string() }
fn default_embedding_model() -> String { crate::DEFAULT_EMBEDDING_MODEL.to_string() }
fn default_completion_model() -> String { crate::DEFAULT_COMPLETION_MODEL.to_string() }
fn default_upstream_timeout() -> u64 { 30 }
fn default_project_id() -> String { "3a512b1".to_string() }
fn default_namespace() -> String { "vision".to_string() }
fn default_top_k() -> usize { crate::DEFAULT_TOP_K }
fn default_metrics_port() -> u16 { 9090 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            embedding: EmbeddingConfig::default(),
            vector_index: VectorIndexConfig::default(),
            completion: CompletionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_openai_provider(),
            api_key: None,
            api_base: None,
            model: default_embedding_model(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            provider: default_index_provider(),
            api_key: None,
            environment: None,
            index_name: None,
            project_id: default_project_id(),
            host: None,
            namespace: default_namespace(),
            top_k: default_top_k(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: default_openai_provider(),
            api_key: None,
            api_base: None,
            model: default_completion_model(),
            temperature: 0.0,
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            json_logging: false,
            metrics_port: default_metrics_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_environment());

        let mut builder = Config::builder().set_default("environment", env.as_str())?;

        for (key, var) in PROVIDER_ENV_VARS {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(*key, value)?;
            }
        }

        let config = builder
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Minimum log level: explicit setting, else `debug` in development and `warn` elsewhere
    pub fn log_filter(&self) -> String {
        match &self.observability.log_level {
            Some(level) => level.clone(),
            None if self.is_development() => "debug".to_string(),
            None => "warn".to_string(),
        }
    }

    /// Check that every real provider has what it needs to make calls
    pub fn validate(&self) -> Result<()> {
        if self.embedding.provider == "openai" && self.embedding.api_key.is_none() {
            return Err(missing("embedding.api_key (OPENAI_API_KEY)"));
        }
        if self.completion.provider == "openai" && self.completion.api_key.is_none() {
            return Err(missing("completion.api_key (OPENAI_API_KEY)"));
        }
        if self.vector_index.provider == "pinecone" {
            if self.vector_index.api_key.is_none() {
                return Err(missing("vector_index.api_key (PINECONE_API_KEY)"));
            }
            self.vector_index.query_url()?;
        }
        Ok(())
    }
}

impl VectorIndexConfig {
    /// URL of the index's query endpoint
    pub fn query_url(&self) -> Result<String> {
        if let Some(host) = &self.host {
            let host = host.trim_end_matches('/');
            return Ok(if host.starts_with("http://") || host.starts_with("https://") {
                format!("{}/query", host)
            } else {
                format!("https://{}/query", host)
            });
        }

        match (&self.index_name, &self.environment) {
            (Some(index), Some(environment)) => Ok(format!(
                "https://{}-{}.svc.{}.pinecone.io/query",
                index, self.project_id, environment
            )),
            (None, _) => Err(missing("vector_index.index_name (PINECONE_INDEX_NAME)")),
            (_, None) => Err(missing("vector_index.environment (PINECONE_ENVIRONMENT)")),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn missing(key: &str) -> AppError {
    AppError::Configuration {
        message: format!("missing {}", key),
    }
}
