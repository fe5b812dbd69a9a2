//! Client configuration
//!
//! Defaults are compiled in; an optional TOML file and two environment
//! variables override them.

use crate::audio::CaptureMode;
use crate::error::{MealVoiceError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "MEALVOICE_CONFIG";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "MEALVOICE_API_URL";

/// Backend connection settings
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without trailing slash (e.g. `https://host/api`)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Upload timeout in seconds (audio uploads wait for AI analysis)
    pub upload_timeout_secs: u64,
    /// Authorization header scheme: `Token` or `Bearer`
    pub auth_scheme: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            upload_timeout_secs: 120,
            auth_scheme: "Token".to_string(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Upload timeout as a `Duration`
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

/// Longest recording the client will ever capture
pub const MAX_RECORDING_SECS: u64 = 300;

/// Audio capture settings
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordingConfig {
    /// Cap on a single recording, at most [`MAX_RECORDING_SECS`]
    pub max_duration_secs: u64,
    /// RMS level (0.0-1.0) counted as speech
    pub silence_threshold: f32,
    /// Continuous quiet time after speech that stops a toggle recording
    pub silence_duration_ms: u64,
    /// Length of audio analysed per level check
    pub check_interval_ms: u64,
    /// Sample rate of the uploaded WAV file
    pub upload_sample_rate: u32,
    /// Capture mode selected at startup
    pub default_mode: CaptureMode,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: MAX_RECORDING_SECS,
            silence_threshold: 0.015,
            silence_duration_ms: 2000,
            check_interval_ms: 100,
            upload_sample_rate: 16000,
            default_mode: CaptureMode::Hold,
        }
    }
}

impl RecordingConfig {
    /// Hard cap as a `Duration`, never above [`MAX_RECORDING_SECS`]
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs.min(MAX_RECORDING_SECS))
    }

    /// Quiet period as a `Duration`
    pub fn silence_duration(&self) -> Duration {
        Duration::from_millis(self.silence_duration_ms)
    }

    /// Level check interval as a `Duration`
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

/// Complete client configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Backend settings
    pub api: ApiConfig,
    /// Capture settings
    pub recording: RecordingConfig,
}

impl AppConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the authorization scheme
    pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.api.auth_scheme = scheme.into();
        self
    }

    /// Set the recording configuration
    pub fn with_recording(mut self, recording: RecordingConfig) -> Self {
        self.recording = recording;
        self
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mealvoice").join("config.toml"))
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| MealVoiceError::ConfigError(format!("Invalid config: {}", e)))?;
        Ok(config.with_base_url_normalized())
    }

    /// Load a configuration file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MealVoiceError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Load defaults, then the config file if present, then env overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        let mut config = match path {
            Some(ref path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load_file(path)?
            }
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config = config.with_base_url(url);
        }

        config.validate()?;
        Ok(config)
    }

    fn with_base_url_normalized(self) -> Self {
        let url = self.api.base_url.clone();
        self.with_base_url(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(MealVoiceError::ConfigError(format!(
                "API base URL must start with http:// or https://, got {:?}",
                self.api.base_url
            )));
        }

        if !matches!(self.api.auth_scheme.as_str(), "Token" | "Bearer") {
            return Err(MealVoiceError::ConfigError(format!(
                "Unsupported auth scheme: {}",
                self.api.auth_scheme
            )));
        }

        let rec = &self.recording;
        if rec.max_duration_secs == 0 || rec.max_duration_secs > MAX_RECORDING_SECS {
            return Err(MealVoiceError::ConfigError(format!(
                "max_duration_secs must be between 1 and {}",
                MAX_RECORDING_SECS
            )));
        }
        if !(0.0..=1.0).contains(&rec.silence_threshold) || rec.silence_threshold == 0.0 {
            return Err(MealVoiceError::ConfigError(
                "silence_threshold must be in (0.0, 1.0]".into(),
            ));
        }
        if rec.check_interval_ms == 0 || rec.check_interval_ms > rec.silence_duration_ms {
            return Err(MealVoiceError::ConfigError(
                "check_interval_ms must be non-zero and not longer than silence_duration_ms"
                    .into(),
            ));
        }
        if rec.upload_sample_rate == 0 {
            return Err(MealVoiceError::ConfigError(
                "upload_sample_rate must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
