//! Chat session controller
//!
//! Owns everything the chat window shows: the transcript, the in-flight
//! placeholder, the loading flag, the error and warning banners, the
//! conversation history and the suggestion carousel.
//!
//! A session is either idle, awaiting a response, or showing an error.
//! Only one request can be in flight; a second submit while loading is
//! ignored. Cancelling drops the in-flight request without touching the
//! transcript.

use crate::carousel::SuggestionCarousel;
use crate::client::AssistantClient;
use crate::errors::ClientError;
use crate::history::HistoryBuffer;
use crate::host::{HostNotifier, HostStatus, NoopNotifier};
use crate::FETCH_ERROR_MESSAGE;
use assistant_common::{AskRequest, HistoryEntry, Locale, ResponseStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long the empty-question warning stays visible
pub const WARNING_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(rename = "type")]
    kind: MessageKind,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Assistant,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    AwaitingResponse,
    Error,
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The assistant answered; the text is already in the transcript
    Answered(String),
    /// Blank input, the warning banner is showing
    Rejected,
    /// Another request is in flight
    Busy,
    /// No suggestion at the requested position
    Ignored,
    /// The request failed, the error banner is showing
    Failed,
    /// The user cancelled before the answer arrived
    Cancelled,
}

/// Point-in-time view of the session for rendering
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub locale: Locale,
    pub phase: Phase,
    pub transcript: Vec<Message>,
    pub input: String,
    pub placeholder: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub warning: Option<&'static str>,
    pub history: Vec<HistoryEntry>,
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug)]
struct Warning {
    text: &'static str,
    expires_at: Instant,
}

#[derive(Debug)]
struct ActiveRequest {
    id: u64,
    token: CancellationToken,
}

#[derive(Debug)]
struct SessionState {
    locale: Locale,
    transcript: Vec<Message>,
    input: String,
    pending: Option<String>,
    loading: bool,
    error: Option<String>,
    warning: Option<Warning>,
    history: HistoryBuffer,
    carousel: SuggestionCarousel,
    active: Option<ActiveRequest>,
    next_request_id: u64,
}

impl SessionState {
    fn new(locale: Locale) -> Self {
        Self {
            locale,
            transcript: vec![Message::assistant(locale.greeting())],
            input: String::new(),
            pending: None,
            loading: false,
            error: None,
            warning: None,
            history: HistoryBuffer::default(),
            carousel: SuggestionCarousel::new(locale),
            active: None,
            next_request_id: 0,
        }
    }

    /// Show a warning; a new one restarts the timer
    fn warn(&mut self, text: &'static str) {
        self.warning = Some(Warning {
            text,
            expires_at: Instant::now() + WARNING_DURATION,
        });
    }

    fn visible_warning(&mut self) -> Option<&'static str> {
        match &self.warning {
            Some(w) if Instant::now() < w.expires_at => Some(w.text),
            Some(_) => {
                self.warning = None;
                None
            }
            None => None,
        }
    }

    fn phase(&self) -> Phase {
        if self.loading {
            Phase::AwaitingResponse
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    fn placeholder(&self) -> &'static str {
        if self.loading {
            self.locale.typing_indicator()
        } else {
            self.locale.input_placeholder()
        }
    }

    /// Transcript plus the pending assistant text when there is any
    fn rendered_transcript(&self) -> Vec<Message> {
        let mut messages = self.transcript.clone();
        if let Some(pending) = self.pending.as_deref().filter(|p| !p.is_empty()) {
            messages.push(Message::assistant(pending));
        }
        messages
    }

    fn finish(&mut self) {
        self.active = None;
        self.loading = false;
        self.pending = None;
    }

    fn is_current(&self, id: u64) -> bool {
        self.active.as_ref().map(|a| a.id) == Some(id)
    }
}

/// Chat session bound to one gateway client and one host.
///
/// Cheap to clone; clones share state, so a submit can run on one task
/// while another task cancels it.
#[derive(Clone)]
pub struct ChatSession {
    client: Arc<dyn AssistantClient>,
    host: Arc<dyn HostNotifier>,
    state: Arc<Mutex<SessionState>>,
}

impl ChatSession {
    /// New session showing the locale greeting
    pub fn new(locale: Locale, client: Arc<dyn AssistantClient>) -> Self {
        Self::with_host(locale, client, Arc::new(NoopNotifier))
    }

    pub fn with_host(
        locale: Locale,
        client: Arc<dyn AssistantClient>,
        host: Arc<dyn HostNotifier>,
    ) -> Self {
        Self {
            client,
            host,
            state: Arc::new(Mutex::new(SessionState::new(locale))),
        }
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.lock().await.input = text.into();
    }

    /// Submit the current input
    pub async fn submit(&self) -> SubmitOutcome {
        let (request, question, token, id) = {
            let mut state = self.state.lock().await;
            if state.loading {
                return SubmitOutcome::Busy;
            }
            state.error = None;

            let question = state.input.trim().to_string();
            if question.is_empty() {
                let warning = state.locale.empty_question_warning();
                state.warn(warning);
                return SubmitOutcome::Rejected;
            }

            state.transcript.push(Message::user(question.clone()));
            state.warning = None;
            state.input.clear();
            state.loading = true;
            state.pending = Some(String::new());
            state.carousel.shuffle();
            state.history.archive();

            state.next_request_id += 1;
            let id = state.next_request_id;
            let token = CancellationToken::new();
            state.active = Some(ActiveRequest {
                id,
                token: token.clone(),
            });

            let request = AskRequest::new(question.clone(), state.history.to_vec(), state.locale);
            (request, question, token, id)
        };

        self.host.notify(HostStatus::RequestStarted);
        debug!(request_id = id, "Question submitted");

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::AbortedByUser),
            result = self.client.ask(&request, token.clone()) => result,
        };

        let mut state = self.state.lock().await;
        if !state.is_current(id) {
            // Cancelled or superseded while the lock was released
            return SubmitOutcome::Cancelled;
        }
        state.finish();

        match result {
            Ok(response) => {
                let answer = response.assistant_message;
                state.transcript.push(Message::assistant(answer.clone()));
                state.history.push(HistoryEntry::new(question, answer.clone()));
                drop(state);

                if response.status == ResponseStatus::Done {
                    self.host.notify(HostStatus::RequestEnded);
                }
                SubmitOutcome::Answered(answer)
            }
            Err(ClientError::AbortedByUser) => SubmitOutcome::Cancelled,
            Err(e) => {
                warn!(request_id = id, error = %e, "Request to assistant failed");
                state.error = Some(FETCH_ERROR_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Submit the suggestion at `index` within the visible window.
    /// Does nothing while loading.
    pub async fn choose_suggestion(&self, index: usize) -> SubmitOutcome {
        {
            let mut state = self.state.lock().await;
            if state.loading {
                return SubmitOutcome::Busy;
            }
            let Some(prompt) = state.carousel.visible().get(index).copied() else {
                return SubmitOutcome::Ignored;
            };
            state.input = prompt.to_string();
        }
        self.submit().await
    }

    /// Abort the in-flight request. Returns false when there is none.
    pub async fn cancel(&self) -> bool {
        let mut state = self.state.lock().await;
        let Some(active) = state.active.take() else {
            return false;
        };
        active.token.cancel();
        state.finish();
        state.error = None;
        drop(state);

        debug!(request_id = active.id, "Request cancelled");
        self.host.notify(HostStatus::RequestAborted);
        true
    }

    pub async fn scroll_left(&self) {
        self.state.lock().await.carousel.scroll_left();
    }

    pub async fn scroll_right(&self) {
        self.state.lock().await.carousel.scroll_right();
    }

    pub async fn placeholder(&self) -> &'static str {
        self.state.lock().await.placeholder()
    }

    pub async fn transcript(&self) -> Vec<Message> {
        self.state.lock().await.rendered_transcript()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let mut state = self.state.lock().await;
        let warning = state.visible_warning();
        SessionSnapshot {
            locale: state.locale,
            phase: state.phase(),
            transcript: state.rendered_transcript(),
            input: state.input.clone(),
            placeholder: state.placeholder(),
            loading: state.loading,
            error: state.error.clone(),
            warning,
            history: state.history.to_vec(),
            suggestions: state.carousel.visible().to_vec(),
        }
    }
}
