//! Notifications to the host embedding the widget
//!
//! Fire and forget: the host never acknowledges.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostStatus {
    #[serde(rename = "request-started")]
    RequestStarted,
    #[serde(rename = "request-ended")]
    RequestEnded,
    #[serde(rename = "request-aborted")]
    RequestAborted,
}

/// Message posted to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEvent {
    pub status: HostStatus,
}

pub trait HostNotifier: Send + Sync {
    fn notify(&self, status: HostStatus);
}

/// Notifier for a widget that is not embedded anywhere
pub struct NoopNotifier;

impl HostNotifier for NoopNotifier {
    fn notify(&self, _status: HostStatus) {}
}

/// Forwards events to a channel owned by the host task
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl HostNotifier for ChannelNotifier {
    fn notify(&self, status: HostStatus) {
        if self.tx.send(HostEvent { status }).is_err() {
            tracing::debug!(?status, "Host receiver gone, event dropped");
        }
    }
}

/// Writes each event as one JSON line
pub struct JsonLinesNotifier<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesNotifier<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> HostNotifier for JsonLinesNotifier<W> {
    fn notify(&self, status: HostStatus) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = write_line(&mut *writer, &HostEvent { status }) {
            tracing::warn!(error = %e, "Failed to write host event");
        }
    }
}

fn write_line<W: Write>(writer: &mut W, event: &HostEvent) -> std::io::Result<()> {
    serde_json::to_writer(&mut *writer, event)?;
    writer.write_all(b"\n")?;
    writer.flush()
}
