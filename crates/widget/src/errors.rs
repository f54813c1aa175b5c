//! Error types for the widget client

use thiserror::Error;

/// Failure of one request to the gateway
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    /// The user cancelled; not surfaced as an error banner
    #[error("request aborted by user")]
    AbortedByUser,
}

impl ClientError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ClientError::AbortedByUser)
    }
}
