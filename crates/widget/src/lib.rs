//! Vision Assistant Chat Widget
//!
//! Client side of the assistant:
//! - Chat session controller (transcript, pending/loading, error and warning banners)
//! - Bounded question/answer history
//! - Suggested-prompt carousel
//! - Host notifications for embedding the widget
//! - HTTP client for the gateway with per-request cancellation

pub mod carousel;
pub mod client;
pub mod errors;
pub mod history;
pub mod host;
pub mod session;

pub use client::{AssistantClient, HttpAssistantClient};
pub use errors::ClientError;
pub use history::HistoryBuffer;
pub use host::{HostEvent, HostNotifier, HostStatus};
pub use session::{ChatSession, Message, MessageKind, Phase, SessionSnapshot, SubmitOutcome};

/// Generic banner shown for any failed request
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching the data. Please try again.";

/// Default gateway endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/askAssistant";
