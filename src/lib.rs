//! Mealvoice: log meals by describing them out loud
//!
//! The client records a short voice note, uploads it to the meal service for
//! transcription and nutrition analysis, and shows the resulting meals with
//! daily, weekly and monthly statistics. Freshly logged meals can be reverted
//! for a short while and deleted for a longer one.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod i18n;
pub mod orchestrator;
pub mod state;
pub mod storage;
pub mod timer;
pub mod ui;
pub mod undo;

pub use config::AppConfig;
pub use error::{MealVoiceError, Result};
pub use orchestrator::{Orchestrator, OrchestratorConfig, OrchestratorHandle};
pub use state::{AppCommand, AppEvent, AppState, SharedAppState};
