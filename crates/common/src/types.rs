//! Wire types for the `/askAssistant` endpoint
//!
//! Shared by the gateway (which deserializes requests and serializes
//! responses) and the widget client (which does the opposite).

use crate::locale::Locale;
use serde::{Deserialize, Serialize};

/// A prior question/answer pair.
///
/// Serialized as a two-element JSON array: `["question", "answer"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry(pub String, pub String);

impl HistoryEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self(question.into(), answer.into())
    }

    pub fn question(&self) -> &str {
        &self.0
    }

    pub fn answer(&self) -> &str {
        &self.1
    }
}

/// Request body of `POST /askAssistant`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// User question. Absent, null and blank are all rejected by the orchestrator.
    #[serde(default)]
    pub question: Option<String>,

    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    /// UI locale; unknown or missing values fall back to English
    #[serde(default)]
    pub locale: Locale,
}

impl AskRequest {
    pub fn new(question: impl Into<String>, history: Vec<HistoryEntry>, locale: Locale) -> Self {
        Self {
            question: Some(question.into()),
            history,
            locale,
        }
    }
}

/// Completion marker carried in every successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    #[serde(rename = "DONE", alias = "[DONE]")]
    Done,
}

/// Successful response body of `POST /askAssistant`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    #[serde(default)]
    pub assistant_message: String,
    pub status: ResponseStatus,
}

impl AskResponse {
    pub fn done(assistant_message: impl Into<String>) -> Self {
        Self {
            assistant_message: assistant_message.into(),
            status: ResponseStatus::Done,
        }
    }
}
