//! Vision Assistant Common Library
//!
//! Shared code for the assistant gateway and the chat widget:
//! - Wire types for the `/askAssistant` endpoint
//! - Locale tables (greetings, warnings, instruction templates)
//! - Embedding, vector index and completion provider clients
//! - Context and prompt assembly
//! - The embed → retrieve → generate answer pipeline
//! - Error types, configuration, metrics and tracing setup

pub mod completion;
pub mod config;
pub mod context;
pub mod embeddings;
pub mod errors;
pub mod locale;
pub mod metrics;
pub mod orchestrator;
pub mod retrieval;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use completion::ChatModel;
pub use config::AppConfig;
pub use embeddings::Embedder;
pub use errors::{AppError, Result};
pub use locale::Locale;
pub use orchestrator::Orchestrator;
pub use retrieval::VectorIndex;
pub use types::{AskRequest, AskResponse, HistoryEntry, ResponseStatus};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Default completion model
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Number of nearest neighbours requested from the vector index
pub const DEFAULT_TOP_K: usize = 3;

/// Maximum number of question/answer pairs sent with a request
pub const MAX_HISTORY_ENTRIES: usize = 9;
