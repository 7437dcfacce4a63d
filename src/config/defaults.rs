// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Api**: Service endpoint and request timeout
//! - **Webcam**: Floating preview geometry and capture device
//! - **Diagnostics**: Event buffer bounds

// ==========================================================================
// Api Defaults
// ==========================================================================

/// Base URL of the assessment and test-taking services.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api/v1";

/// Default request timeout (in seconds).
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

/// Minimum request timeout (in seconds).
pub const MIN_API_TIMEOUT_SECS: u64 = 1;

/// Maximum request timeout (in seconds).
pub const MAX_API_TIMEOUT_SECS: u64 = 120;

// ==========================================================================
// Webcam Defaults
// ==========================================================================

/// Width of the floating webcam preview (logical pixels).
pub const DEFAULT_WEBCAM_WIDTH: f32 = 300.0;

/// Height of the floating webcam preview (logical pixels).
pub const DEFAULT_WEBCAM_HEIGHT: f32 = 200.0;

/// Smallest accepted preview edge.
pub const MIN_WEBCAM_EDGE: f32 = 80.0;

/// Largest accepted preview edge.
pub const MAX_WEBCAM_EDGE: f32 = 1280.0;

/// Initial horizontal position of the preview anchor.
pub const DEFAULT_WEBCAM_X: f32 = 24.0;

/// Initial vertical position of the preview anchor.
pub const DEFAULT_WEBCAM_Y: f32 = 96.0;

/// Whether the camera feed is mirrored like a selfie view.
pub const DEFAULT_WEBCAM_MIRRORED: bool = true;

/// Capture backend used when none is configured.
#[cfg(target_os = "linux")]
pub const DEFAULT_CAPTURE_FORMAT: &str = "v4l2";
#[cfg(target_os = "macos")]
pub const DEFAULT_CAPTURE_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
pub const DEFAULT_CAPTURE_FORMAT: &str = "dshow";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAPTURE_FORMAT: &str = "v4l2";

/// Capture device used when none is configured.
#[cfg(target_os = "linux")]
pub const DEFAULT_CAPTURE_DEVICE: &str = "/dev/video0";
#[cfg(target_os = "macos")]
pub const DEFAULT_CAPTURE_DEVICE: &str = "0";
#[cfg(target_os = "windows")]
pub const DEFAULT_CAPTURE_DEVICE: &str = "video=Integrated Camera";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAPTURE_DEVICE: &str = "/dev/video0";

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1000;

/// Minimum diagnostic buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum diagnostic buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_API_TIMEOUT_SECS <= DEFAULT_API_TIMEOUT_SECS);
    assert!(DEFAULT_API_TIMEOUT_SECS <= MAX_API_TIMEOUT_SECS);

    assert!(DEFAULT_WEBCAM_WIDTH >= MIN_WEBCAM_EDGE);
    assert!(DEFAULT_WEBCAM_HEIGHT >= MIN_WEBCAM_EDGE);
    assert!(DEFAULT_WEBCAM_WIDTH <= MAX_WEBCAM_EDGE);

    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY <= DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
};
