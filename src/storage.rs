//! Durable client state
//!
//! Only the auth credential (with the cached user) and the language
//! preference survive a restart. Everything else is refetched.

use crate::api::User;
use crate::error::{MealVoiceError, Result};
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The persisted slice of application state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub user: Option<User>,
    pub language: Language,
}

/// JSON file holding a [`PersistedSession`]
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory, falling back to the working dir
    pub fn default_location() -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join("mealvoice"))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session; a missing or corrupt file yields the default
    pub fn load(&self) -> PersistedSession {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No persisted session at {}: {}", self.path.display(), e);
                return PersistedSession::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
            PersistedSession::default()
        })
    }

    /// Write the session atomically (temp file + rename)
    pub fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| MealVoiceError::IOError(format!("Failed to serialize session: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Drop the credential but keep the language preference
    pub fn clear_auth(&self) -> Result<()> {
        let mut session = self.load();
        session.token = None;
        session.user = None;
        self.save(&session)
    }

    /// Persist the auth credential and user
    pub fn save_auth(&self, token: &str, user: &User) -> Result<()> {
        let mut session = self.load();
        session.token = Some(token.to_string());
        session.user = Some(user.clone());
        self.save(&session)
    }

    /// Persist the language preference
    pub fn save_language(&self, language: Language) -> Result<()> {
        let mut session = self.load();
        session.language = language;
        self.save(&session)
    }
}
