// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Session(String),
    Api(ApiError),
    Camera(CameraError),
}

/// Failures talking to the assessment and test-taking services.
/// Used to provide user-friendly, localized error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The configured base URL cannot be turned into a request URL.
    InvalidUrl(String),

    /// Connection refused, DNS failure, timeout, TLS error...
    Transport(String),

    /// The server answered with a non-2xx status code.
    Status(u16),

    /// The response body is not the JSON we expected.
    Decode(String),
}

impl ApiError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ApiError::InvalidUrl(_) => "error-api-invalid-url",
            ApiError::Transport(_) => "error-api-transport",
            ApiError::Status(_) => "error-api-status",
            ApiError::Decode(_) => "error-api-decode",
        }
    }

    /// Categorizes a reqwest failure.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ApiError::Status(status.as_u16());
        }
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        ApiError::Transport(err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidUrl(url) => write!(f, "Invalid service URL: {}", url),
            ApiError::Transport(msg) => write!(f, "Request failed: {}", msg),
            ApiError::Status(code) => write!(f, "Server responded with status {}", code),
            ApiError::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
        }
    }
}

/// Camera capture failures reported by the capture task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// FFmpeg could not be initialized.
    Init(String),

    /// No capture backend with the configured name is compiled into FFmpeg.
    BackendUnavailable(String),

    /// The device could not be opened (missing, busy, permission denied).
    DeviceUnavailable(String),

    /// The device opened but exposes no video stream.
    NoVideoStream,

    /// Decoding or scaling a captured frame failed.
    DecodingFailed(String),
}

impl CameraError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            CameraError::Init(_) => "error-camera-init",
            CameraError::BackendUnavailable(_) => "error-camera-backend",
            CameraError::DeviceUnavailable(_) => "error-camera-device",
            CameraError::NoVideoStream => "error-camera-no-video-stream",
            CameraError::DecodingFailed(_) => "error-camera-decoding",
        }
    }

    /// Attempts to sort a raw FFmpeg message into a specific variant.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("no such file")
            || msg_lower.contains("no such device")
            || msg_lower.contains("permission denied")
            || msg_lower.contains("device or resource busy")
            || msg_lower.contains("input/output error")
        {
            return CameraError::DeviceUnavailable(msg.to_string());
        }

        if msg_lower.contains("no video stream") {
            return CameraError::NoVideoStream;
        }

        CameraError::DecodingFailed(msg.to_string())
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Init(msg) => write!(f, "FFmpeg initialization failed: {}", msg),
            CameraError::BackendUnavailable(name) => {
                write!(f, "Capture backend not available: {}", name)
            }
            CameraError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::NoVideoStream => write!(f, "Camera exposes no video stream"),
            CameraError::DecodingFailed(msg) => write!(f, "Camera decoding failed: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Session(e) => write!(f, "Session Error: {}", e),
            Error::Api(e) => write!(f, "API Error: {}", e),
            Error::Camera(e) => write!(f, "Camera Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<CameraError> for Error {
    fn from(err: CameraError) -> Self {
        Error::Camera(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Session(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
