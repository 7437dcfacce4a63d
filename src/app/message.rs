// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::ApiError;
use crate::exam::{test_details, view as examination, RequestToken, SubmissionToken};
use crate::ui::notifications;
use crate::webcam;
use serde_json::Value;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Examination(examination::Message),
    TestDetails(test_details::Message),
    Webcam(webcam::Message),
    Notification(notifications::NotificationMessage),
    /// Finalized assessments for the fetch identified by `token`.
    AssessmentsLoaded {
        token: RequestToken,
        result: Result<Value, ApiError>,
    },
    TestStarted {
        question_set_id: String,
        result: Result<Value, ApiError>,
    },
    /// Outcome of the submission identified by `token`. `violations_saved`
    /// counts the violations the service accepted before the section was sent.
    SectionSubmitted {
        token: SubmissionToken,
        violations_saved: usize,
        result: Result<Value, ApiError>,
    },
    WindowFocusChanged { focused: bool },
    /// Inner size of the window, in logical pixels.
    WindowResized(iced::Size),
    ExportDiagnostics,
    /// Periodic tick: drains diagnostics, expires toasts, refreshes the
    /// preview's stream availability.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Candidate record (JSON) to place in the session cache.
    pub candidate: Option<String>,
    /// Service base URL, overriding `[api] base_url`.
    pub api_url: Option<String>,
    /// Camera device, overriding `[webcam] device`.
    pub device: Option<String>,
    /// Takes precedence over `PROCTOR_LENS_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Takes precedence over `PROCTOR_LENS_CONFIG_DIR`.
    pub config_dir: Option<String>,
}
