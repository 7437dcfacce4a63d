// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! This module provides the central collector that receives events from
//! various parts of the application and stores them in a circular buffer.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::Serialize;

use super::{
    AppStateEvent, BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind,
    UserAction,
};

/// Handle for sending diagnostic events to the collector.
///
/// This handle is cheap to clone and can be shared across threads.
/// Events are sent via a bounded channel to avoid blocking the UI thread.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Creates a handle whose events go nowhere.
    ///
    /// Useful for clients constructed outside the application, e.g. in tests.
    #[must_use]
    pub fn disconnected() -> Self {
        let (event_tx, _) = bounded(1);
        Self { event_tx }
    }

    fn send(&self, kind: DiagnosticEventKind) {
        // Non-blocking send - drop if channel is full or closed
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }

    pub fn log_action(&self, action: UserAction) {
        self.send(DiagnosticEventKind::UserAction {
            action,
            details: None,
        });
    }

    pub fn log_state(&self, state: AppStateEvent) {
        self.send(DiagnosticEventKind::AppState { state });
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    pub fn log_error(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Error {
            message: message.into(),
        });
    }
}

/// Errors raised while exporting a report.
#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Serialization(serde_json::Error),
    /// No data directory could be determined.
    NoDirectory,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ExportError::NoDirectory => write!(f, "No data directory available"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err)
    }
}

#[derive(Serialize)]
struct DiagnosticReport<'a> {
    app_version: &'static str,
    collection_started_at: DateTime<Utc>,
    exported_at: DateTime<Utc>,
    event_count: usize,
    events: Vec<&'a DiagnosticEvent>,
}

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Central collector for diagnostic events.
///
/// The collector receives events through a channel and stores them in a
/// memory-bounded circular buffer. Old events are automatically evicted
/// when the buffer reaches capacity.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    collection_started_at: DateTime<Utc>,
}

impl fmt::Debug for DiagnosticsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsCollector")
            .field("len", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Drains the event channel into the buffer.
    ///
    /// Call this on each UI tick.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    /// Logs an action directly to the buffer (bypassing the channel).
    pub fn log_action(&mut self, action: UserAction) {
        self.buffer
            .push(DiagnosticEvent::new(DiagnosticEventKind::UserAction {
                action,
                details: None,
            }));
    }

    /// Logs a state change directly to the buffer (bypassing the channel).
    pub fn log_state(&mut self, state: AppStateEvent) {
        self.buffer
            .push(DiagnosticEvent::new(DiagnosticEventKind::AppState { state }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    /// Serializes the buffer as a pretty-printed JSON report.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let events: Vec<&DiagnosticEvent> = self.buffer.iter().collect();
        let report = DiagnosticReport {
            app_version: env!("CARGO_PKG_VERSION"),
            collection_started_at: self.collection_started_at,
            exported_at: Utc::now(),
            event_count: events.len(),
            events,
        };
        serde_json::to_string_pretty(&report)
    }

    /// Writes the report into `dir` under a timestamped file name.
    ///
    /// The file is written atomically to prevent corruption.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(generate_default_filename());
        let json = self.export_json()?;
        write_atomic(&path, &json)?;
        Ok(path)
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

fn generate_default_filename() -> String {
    let now = Local::now();
    format!(
        "proctor_lens_diagnostics_{}.json",
        now.format("%Y%m%d_%H%M%S")
    )
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn collector_new_creates_empty_buffer() {
        let collector = DiagnosticsCollector::new(BufferCapacity::default());
        assert!(collector.is_empty());
    }

    #[test]
    fn handle_events_arrive_after_process_pending() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        handle.log_warning("camera slow");
        handle.log_error("request failed");
        assert!(collector.is_empty());

        collector.process_pending();
        assert_eq!(collector.len(), 2);

        let kinds: Vec<_> = collector.iter().map(|e| e.kind.clone()).collect();
        assert!(matches!(&kinds[0], DiagnosticEventKind::Warning { message } if message == "camera slow"));
        assert!(matches!(&kinds[1], DiagnosticEventKind::Error { .. }));
    }

    #[test]
    fn handle_drops_events_when_channel_is_full() {
        let mut collector = DiagnosticsCollector::default();
        let handle = collector.handle();

        for _ in 0..(DEFAULT_CHANNEL_CAPACITY + 50) {
            handle.log_action(UserAction::EndDrag);
        }
        collector.process_pending();

        assert_eq!(collector.len(), DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn disconnected_handle_never_panics() {
        let handle = DiagnosticsHandle::disconnected();
        handle.log_error("nobody listens");
        handle.log_state(AppStateEvent::CameraStopped);
    }

    #[test]
    fn direct_logging_bypasses_channel() {
        let mut collector = DiagnosticsCollector::default();
        collector.log_action(UserAction::SubmitSection);
        collector.log_state(AppStateEvent::Started {
            locale: "en-US".to_string(),
        });
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn export_json_contains_events() {
        let mut collector = DiagnosticsCollector::default();
        collector.log_action(UserAction::ExportDiagnostics);

        let json = collector.export_json().expect("export should succeed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["event_count"], 1);
        assert_eq!(value["events"][0]["type"], "user_action");
    }

    #[test]
    fn export_to_dir_writes_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut collector = DiagnosticsCollector::default();
        collector.log_action(UserAction::EndDrag);

        let path = collector
            .export_to_dir(&temp_dir.path().join("diagnostics"))
            .expect("export should succeed");

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }
}
