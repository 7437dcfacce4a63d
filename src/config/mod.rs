// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[api]` - Service base URL and request timeout
//! - `[webcam]` - Capture device and floating preview geometry
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` or set `PROCTOR_LENS_CONFIG_DIR`
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use proctor_lens::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.general.language = Some("fr".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Remote service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL shared by the assessment and test services.
    #[serde(default = "default_base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(
        default = "default_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Base URL with the default applied.
    #[must_use]
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Timeout clamped to the accepted range.
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        let secs = self
            .timeout_secs
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS)
            .clamp(MIN_API_TIMEOUT_SECS, MAX_API_TIMEOUT_SECS);
        std::time::Duration::from_secs(secs)
    }
}

/// Camera capture and floating preview settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebcamConfig {
    /// Device path or name handed to the capture backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// FFmpeg capture backend (`v4l2`, `avfoundation`, `dshow`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,

    /// Preview width in logical pixels.
    #[serde(default = "default_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    /// Preview height in logical pixels.
    #[serde(default = "default_height", skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// Horizontal position the preview resets to on every mount.
    #[serde(default = "default_initial_x", skip_serializing_if = "Option::is_none")]
    pub initial_x: Option<f32>,

    /// Vertical position the preview resets to on every mount.
    #[serde(default = "default_initial_y", skip_serializing_if = "Option::is_none")]
    pub initial_y: Option<f32>,

    /// Mirror the camera feed horizontally.
    #[serde(default = "default_mirrored", skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<bool>,
}

impl Default for WebcamConfig {
    fn default() -> Self {
        Self {
            device: None,
            input_format: None,
            width: default_width(),
            height: default_height(),
            initial_x: default_initial_x(),
            initial_y: default_initial_y(),
            mirrored: default_mirrored(),
        }
    }
}

impl WebcamConfig {
    /// Preview size, each edge clamped to the accepted range.
    #[must_use]
    pub fn size(&self) -> iced::Size {
        let width = self
            .width
            .unwrap_or(DEFAULT_WEBCAM_WIDTH)
            .clamp(MIN_WEBCAM_EDGE, MAX_WEBCAM_EDGE);
        let height = self
            .height
            .unwrap_or(DEFAULT_WEBCAM_HEIGHT)
            .clamp(MIN_WEBCAM_EDGE, MAX_WEBCAM_EDGE);
        iced::Size::new(width, height)
    }

    /// Position the preview starts at.
    #[must_use]
    pub fn initial_position(&self) -> iced::Point {
        iced::Point::new(
            self.initial_x.unwrap_or(DEFAULT_WEBCAM_X),
            self.initial_y.unwrap_or(DEFAULT_WEBCAM_Y),
        )
    }

    #[must_use]
    pub fn device_or_default(&self) -> String {
        self.device
            .clone()
            .unwrap_or_else(|| DEFAULT_CAPTURE_DEVICE.to_string())
    }

    #[must_use]
    pub fn input_format_or_default(&self) -> String {
        self.input_format
            .clone()
            .unwrap_or_else(|| DEFAULT_CAPTURE_FORMAT.to_string())
    }

    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored.unwrap_or(DEFAULT_WEBCAM_MIRRORED)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Remote service settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Camera capture and preview settings.
    #[serde(default)]
    pub webcam: WebcamConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_base_url() -> Option<String> {
    Some(DEFAULT_API_BASE_URL.to_string())
}

fn default_timeout_secs() -> Option<u64> {
    Some(DEFAULT_API_TIMEOUT_SECS)
}

fn default_width() -> Option<f32> {
    Some(DEFAULT_WEBCAM_WIDTH)
}

fn default_height() -> Option<f32> {
    Some(DEFAULT_WEBCAM_HEIGHT)
}

fn default_initial_x() -> Option<f32> {
    Some(DEFAULT_WEBCAM_X)
}

fn default_initial_y() -> Option<f32> {
    Some(DEFAULT_WEBCAM_Y)
}

fn default_mirrored() -> Option<bool> {
    Some(DEFAULT_WEBCAM_MIRRORED)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning to show the user.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(_) => {
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.general.theme_mode, ThemeMode::System);
        assert_eq!(config.api.base_url.as_deref(), Some(DEFAULT_API_BASE_URL));
        assert_eq!(config.api.timeout_secs, Some(DEFAULT_API_TIMEOUT_SECS));
        assert_eq!(config.webcam.width, Some(300.0));
        assert_eq!(config.webcam.height, Some(200.0));
        assert_eq!(config.webcam.mirrored, Some(true));
        assert!(config.webcam.device.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        let config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
                theme_mode: ThemeMode::Dark,
            },
            api: ApiConfig {
                base_url: Some("https://exams.example.com/api/v1".to_string()),
                timeout_secs: Some(30),
            },
            webcam: WebcamConfig {
                device: Some("/dev/video2".to_string()),
                input_format: Some("v4l2".to_string()),
                width: Some(320.0),
                height: Some(240.0),
                initial_x: Some(10.0),
                initial_y: Some(20.0),
                mirrored: Some(false),
            },
        };

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[general]\nlanguage = \"fr\"\n").expect("write");

        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.general.language.as_deref(), Some("fr"));
        assert_eq!(loaded.api, ApiConfig::default());
        assert_eq!(loaded.webcam, WebcamConfig::default());
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_theme_mode_is_rejected() {
        let parsed: std::result::Result<Config, _> =
            toml::from_str("[general]\ntheme_mode = \"sepia\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn load_with_override_reports_warning_for_broken_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[[[").expect("write");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn load_with_override_missing_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn save_with_override_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let nested = temp_dir.path().join("deep").join("path");

        save_with_override(&Config::default(), Some(nested.clone())).expect("save");

        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn webcam_size_is_clamped() {
        let webcam = WebcamConfig {
            width: Some(10.0),
            height: Some(5000.0),
            ..WebcamConfig::default()
        };
        let size = webcam.size();
        assert_abs_diff_eq!(size.width, MIN_WEBCAM_EDGE);
        assert_abs_diff_eq!(size.height, MAX_WEBCAM_EDGE);
    }

    #[test]
    fn api_timeout_is_clamped() {
        let api = ApiConfig {
            timeout_secs: Some(0),
            ..ApiConfig::default()
        };
        assert_eq!(api.timeout().as_secs(), MIN_API_TIMEOUT_SECS);
    }

    #[test]
    fn blank_base_url_uses_default() {
        let api = ApiConfig {
            base_url: Some("  ".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(api.base_url_or_default(), DEFAULT_API_BASE_URL);
    }
}
