// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candidate-initiated actions worth correlating with failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// Pressed "Give Test" on an examination card.
    GiveTest { question_set_id: String },

    /// Returned to the examination list.
    BackToExaminations,

    /// Picked an answer option.
    SelectAnswer { question_id: String },

    /// Submitted the current section.
    SubmitSection,

    /// Started dragging the webcam preview.
    BeginDrag {
        /// `mouse` or `touch`.
        pointer: String,
    },

    /// Released the webcam preview.
    EndDrag,

    /// Exported the diagnostics buffer.
    ExportDiagnostics,
}

/// Application state transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AppStateEvent {
    /// Session started with the given locale.
    Started { locale: String },

    /// Eligibility resolution reached a terminal display.
    EligibilityResolved {
        /// `not_shortlisted`, `eligible` or `fetch_error`.
        outcome: String,
        card_count: usize,
    },

    /// A response arrived for an outdated request and was dropped.
    StaleResponseDropped { token: u64 },

    /// Camera capture delivered its stream handle.
    CameraStarted { device: String },

    /// Camera capture ended or failed.
    CameraStopped,

    /// A proctoring violation was recorded.
    ViolationRecorded { kind: String },
}

/// A diagnostic event with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticEvent {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The type and data of the event.
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },

    AppState {
        state: AppStateEvent,
    },

    /// Non-critical issue; the application carried on.
    Warning {
        message: String,
    },

    /// An operation failed.
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_event_new_uses_current_time() {
        let before = Utc::now();
        let event = DiagnosticEvent::new(DiagnosticEventKind::Warning {
            message: "slow".to_string(),
        });
        assert!(event.timestamp >= before);
        assert!(event.timestamp <= Utc::now());
    }

    #[test]
    fn warning_serializes_with_type_tag() {
        let warning = DiagnosticEventKind::Warning {
            message: "test warning".to_string(),
        };

        let json = serde_json::to_string(&warning).expect("serialization should succeed");
        assert!(json.contains("\"type\":\"warning\""));
        assert!(json.contains("\"message\":\"test warning\""));
    }

    #[test]
    fn user_action_serializes_with_action_tag() {
        let kind = DiagnosticEventKind::UserAction {
            action: UserAction::GiveTest {
                question_set_id: "qs-1".to_string(),
            },
            details: None,
        };
        let json = serde_json::to_string(&kind).expect("serialization should succeed");
        assert!(json.contains("\"action\":\"give_test\""));
        assert!(json.contains("\"question_set_id\":\"qs-1\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn error_deserializes_from_json() {
        let json = r#"{"type":"error","message":"test error"}"#;
        let event: DiagnosticEventKind =
            serde_json::from_str(json).expect("deserialization should succeed");

        match event {
            DiagnosticEventKind::Error { message } => assert_eq!(message, "test error"),
            _ => panic!("expected Error variant"),
        }
    }

    #[test]
    fn event_flattens_kind_next_to_timestamp() {
        let event = DiagnosticEvent::new(DiagnosticEventKind::AppState {
            state: AppStateEvent::CameraStopped,
        });
        let json = serde_json::to_value(&event).expect("serialization should succeed");
        assert_eq!(json["type"], "app_state");
        assert_eq!(json["state"]["state"], "camera_stopped");
        assert!(json.get("timestamp").is_some());
    }
}
