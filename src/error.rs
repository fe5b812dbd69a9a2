//! Error types for the Mealvoice client
//!
//! The taxonomy is flat and mostly driven by HTTP status codes returned by
//! the meal service, plus the local failures of audio capture and config.

use crate::i18n::{tr, Language, Text};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> messages, as returned by the backend on validation failure
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Mealvoice client errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MealVoiceError {
    /// 401 from an authenticated call
    #[error("Authentication required")]
    Unauthorized,

    /// 400 carrying field-level messages
    #[error("Validation failed: {message}")]
    Validation {
        /// Summary message (first non-field error, or a generic one)
        message: String,
        /// Per-field messages for inline display
        fields: FieldErrors,
    },

    /// 400 carrying a fixed domain-rule message (e.g. expired undo window)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// 404, the item no longer exists or is not owned by the user
    #[error("Not found")]
    NotFound,

    /// Other non-success status
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Body excerpt or reason phrase
        message: String,
    },

    /// Transport failure (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The OS refused microphone access
    #[error("Microphone permission denied")]
    MicrophonePermissionDenied,

    /// No capture device present
    #[error("No microphone available")]
    NoMicrophone,

    /// Audio device initialization or operation error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Resampling or encoding error
    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    IOError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Channel communication error
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for MealVoiceError {
    fn from(e: std::io::Error) -> Self {
        MealVoiceError::IOError(e.to_string())
    }
}

impl From<reqwest::Error> for MealVoiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MealVoiceError::Decode(e.to_string())
        } else {
            MealVoiceError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for MealVoiceError {
    fn from(e: serde_json::Error) -> Self {
        MealVoiceError::Decode(e.to_string())
    }
}

impl MealVoiceError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors can be retried by the user as-is; the others need
    /// a different input, a new login, or a device/config change.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MealVoiceError::Unauthorized => false,
            MealVoiceError::Validation { .. } => false,
            MealVoiceError::Rejected(_) => false,
            MealVoiceError::NotFound => false,
            MealVoiceError::Server { status, .. } => *status >= 500,
            MealVoiceError::Network(_) => true,
            MealVoiceError::Decode(_) => false,
            MealVoiceError::MicrophonePermissionDenied => false,
            MealVoiceError::NoMicrophone => false,
            MealVoiceError::AudioDeviceError(_) => false,
            MealVoiceError::AudioProcessingError(_) => true,
            MealVoiceError::IOError(_) => false,
            MealVoiceError::ConfigError(_) => false,
            MealVoiceError::ChannelError(_) => false,
        }
    }

    /// Whether this is the 401 that must force a logout
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, MealVoiceError::Unauthorized)
    }

    /// Field errors, if the backend sent any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            MealVoiceError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Get a user-friendly description of the error, in English
    pub fn user_message(&self) -> String {
        self.message_in(Language::English)
    }

    /// User-facing message in `language`
    ///
    /// Capture errors map to fixed strings; rejections and validation
    /// summaries pass the server message through untranslated.
    pub fn message_in(&self, language: Language) -> String {
        let text = match self {
            MealVoiceError::Validation { message, .. } => return message.clone(),
            MealVoiceError::Rejected(message) => return message.clone(),
            MealVoiceError::Unauthorized => Text::SessionExpired,
            MealVoiceError::NotFound => Text::ItemGone,
            MealVoiceError::Server { .. } => Text::ServerFailed,
            MealVoiceError::Network(_) => Text::Offline,
            MealVoiceError::Decode(_) => Text::UnexpectedResponse,
            MealVoiceError::MicrophonePermissionDenied => Text::MicrophoneDenied,
            MealVoiceError::NoMicrophone => Text::NoMicrophone,
            MealVoiceError::AudioDeviceError(_) => Text::AudioDeviceFailed,
            MealVoiceError::AudioProcessingError(_) => Text::AudioProcessingFailed,
            MealVoiceError::IOError(_) => Text::FileSystemFailed,
            MealVoiceError::ConfigError(_) => Text::ConfigInvalid,
            MealVoiceError::ChannelError(_) => Text::InternalFailure,
        };
        tr(language, text).to_string()
    }
}

/// Result type alias for Mealvoice operations
pub type Result<T> = std::result::Result<T, MealVoiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_errors_have_fixed_messages() {
        let denied = MealVoiceError::MicrophonePermissionDenied.user_message();
        assert!(denied.contains("denied"));
        assert_ne!(denied, MealVoiceError::NoMicrophone.user_message());
    }

    #[test]
    fn test_messages_follow_language() {
        let korean = MealVoiceError::Unauthorized.message_in(Language::Korean);
        assert_eq!(korean, tr(Language::Korean, Text::SessionExpired));
        assert_ne!(korean, MealVoiceError::Unauthorized.user_message());

        let rejected = MealVoiceError::Rejected("Revert window has expired".into());
        assert_eq!(
            rejected.message_in(Language::Korean),
            "Revert window has expired"
        );
    }

    #[test]
    fn test_rejection_passes_server_message() {
        let err = MealVoiceError::Rejected("Revert window expired".to_string());
        assert_eq!(err.user_message(), "Revert window expired");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_field_errors() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), vec!["Enter a valid email.".to_string()]);
        let err = MealVoiceError::Validation {
            message: "Invalid input".to_string(),
            fields,
        };
        assert_eq!(err.field_errors().map(|f| f.len()), Some(1));
        assert!(MealVoiceError::NotFound.field_errors().is_none());
    }

    #[test]
    fn test_server_errors_recoverable_only_when_5xx() {
        let bad_gateway = MealVoiceError::Server {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        let teapot = MealVoiceError::Server {
            status: 418,
            message: String::new(),
        };
        assert!(bad_gateway.is_recoverable());
        assert!(!teapot.is_recoverable());
    }
}
