//! Shared application state
//!
//! The orchestrator writes it as backend calls complete; the UI reads it on
//! every frame and changes it only by sending [`AppCommand`]s. Events tell
//! the UI that something happened; the data itself always lives here.

use crate::api::{
    AudioFile, DailyStats, DashboardOverview, Meal, MealFilter, MealId, MonthlyStats,
    RegisterRequest, User, WeeklyStats,
};
use crate::error::{FieldErrors, MealVoiceError};
use crate::i18n::Language;
use crate::undo::UndoAction;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::sync::Arc;

/// Where the user is in the authentication flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// No credential
    #[default]
    LoggedOut,
    /// Validating a persisted credential
    Restoring,
    /// Login request in flight
    LoggingIn,
    /// Registration request in flight
    Registering,
    /// Registered, waiting for the email key
    AwaitingVerification { email: String },
    /// Holding a valid credential
    LoggedIn,
}

impl AuthStatus {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthStatus::LoggedIn)
    }

    /// A request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            AuthStatus::Restoring | AuthStatus::LoggingIn | AuthStatus::Registering
        )
    }
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStatus::LoggedOut => write!(f, "LoggedOut"),
            AuthStatus::Restoring => write!(f, "Restoring"),
            AuthStatus::LoggingIn => write!(f, "LoggingIn"),
            AuthStatus::Registering => write!(f, "Registering"),
            AuthStatus::AwaitingVerification { .. } => write!(f, "AwaitingVerification"),
            AuthStatus::LoggedIn => write!(f, "LoggedIn"),
        }
    }
}

/// Credential and form feedback
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub status: AuthStatus,
    pub token: Option<String>,
    pub user: Option<User>,
    /// Form-level error message
    pub error: Option<String>,
    /// Per-field messages from the last rejected form
    pub field_errors: FieldErrors,
    /// Informational message (e.g. "verification email sent")
    pub notice: Option<String>,
}

impl AuthState {
    /// First error for a form field
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn clear_feedback(&mut self) {
        self.error = None;
        self.field_errors.clear();
        self.notice = None;
    }
}

/// Upload pipeline state
///
/// Device capture itself is owned by the UI thread; this tracks what the
/// backend is doing with the finished recording.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    /// Audio sent, waiting for transcription and analysis
    Uploading,
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingState {
    pub upload: UploadState,
    /// Meal created by the last successful upload
    pub last_meal: Option<MealId>,
    pub error: Option<String>,
}

/// Meal list for the current timeline scope
#[derive(Clone, Debug)]
pub struct MealsState {
    pub filter: MealFilter,
    pub items: Vec<Meal>,
    /// Meal opened in the detail view
    pub selected: Option<Meal>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for MealsState {
    fn default() -> Self {
        Self {
            filter: MealFilter::All,
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

/// Aggregates shown on the dashboard and timeline headers
#[derive(Clone, Debug, Default)]
pub struct StatsState {
    pub dashboard: Option<DashboardOverview>,
    pub daily: Option<DailyStats>,
    pub weekly: Option<WeeklyStats>,
    pub monthly: Option<MonthlyStats>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Unified application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub recording: RecordingState,
    pub meals: MealsState,
    pub stats: StatsState,
    pub language: Language,
    /// Dismissible global error
    pub banner: Option<String>,
    /// Bumped whenever a signed-in session ends
    pub session: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every meal currently held anywhere in state, deduplicated by id
    pub fn visible_meals(&self) -> Vec<&Meal> {
        let mut seen = Vec::new();
        let mut meals = Vec::new();
        let dashboard = self
            .stats
            .dashboard
            .iter()
            .flat_map(|d| d.recent_meals.iter());
        let daily = self.stats.daily.iter().flat_map(|d| d.meals.iter());
        for meal in self
            .meals
            .items
            .iter()
            .chain(dashboard)
            .chain(daily)
            .chain(self.meals.selected.iter())
        {
            if !seen.contains(&meal.id) {
                seen.push(meal.id);
                meals.push(meal);
            }
        }
        meals
    }

    /// Look a meal up by id across all containers
    pub fn find_meal(&self, id: MealId) -> Option<&Meal> {
        self.visible_meals().into_iter().find(|m| m.id == id)
    }

    /// Drop a meal from every container; returns whether it was present
    pub fn remove_meal(&mut self, id: MealId) -> bool {
        let mut removed = false;
        let before = self.meals.items.len();
        self.meals.items.retain(|m| m.id != id);
        removed |= self.meals.items.len() != before;

        if let Some(dashboard) = self.stats.dashboard.as_mut() {
            let before = dashboard.recent_meals.len();
            dashboard.recent_meals.retain(|m| m.id != id);
            removed |= dashboard.recent_meals.len() != before;
        }
        if let Some(daily) = self.stats.daily.as_mut() {
            let before = daily.meals.len();
            daily.meals.retain(|m| m.id != id);
            removed |= daily.meals.len() != before;
        }
        if self.meals.selected.as_ref().is_some_and(|m| m.id == id) {
            self.meals.selected = None;
            removed = true;
        }
        removed
    }

    /// Show a freshly created meal before the next refresh
    pub fn insert_meal(&mut self, meal: Meal) {
        let eaten_on = meal.consumed_at.with_timezone(&chrono::Local).date_naive();
        if self.meals.filter.covers(eaten_on) {
            self.meals.items.retain(|m| m.id != meal.id);
            self.meals.items.insert(0, meal.clone());
        }
        if let Some(dashboard) = self.stats.dashboard.as_mut() {
            dashboard.recent_meals.retain(|m| m.id != meal.id);
            dashboard.recent_meals.insert(0, meal);
        }
    }

    /// Forget everything tied to the signed-in user
    ///
    /// Work started before this call belongs to an older `session` and must
    /// not write back.
    pub fn clear_session(&mut self) {
        self.auth = AuthState::default();
        self.recording = RecordingState::default();
        self.meals = MealsState::default();
        self.stats = StatsState::default();
        self.session = self.session.wrapping_add(1);
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }
}

/// Thread-safe shared application state
#[derive(Clone, Default)]
pub struct SharedAppState {
    inner: Arc<RwLock<AppState>>,
}

impl SharedAppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a read lock on the state
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, AppState> {
        self.inner.read()
    }

    /// Get a write lock on the state
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, AppState> {
        self.inner.write()
    }

    /// Copy of the current state (no lock held after return)
    pub fn snapshot(&self) -> AppState {
        self.inner.read().clone()
    }

    // === Convenience read methods ===

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().auth.status.is_logged_in()
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.inner.read().auth.status.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().auth.token.clone()
    }

    pub fn language(&self) -> Language {
        self.inner.read().language
    }

    pub fn is_uploading(&self) -> bool {
        self.inner.read().recording.upload.is_uploading()
    }

    pub fn meal_ids(&self) -> Vec<MealId> {
        self.inner.read().meals.items.iter().map(|m| m.id).collect()
    }

    pub fn banner(&self) -> Option<String> {
        self.inner.read().banner.clone()
    }
}

/// Requests handled by the orchestrator
#[derive(Clone, Debug)]
pub enum AppCommand {
    /// Validate the persisted credential, if any
    RestoreSession,
    Login { email: String, password: String },
    Register(RegisterRequest),
    VerifyEmail { key: String },
    ResendVerification { email: String },
    Logout,
    /// Upload a finished recording
    UploadRecording(AudioFile),
    LoadDashboard,
    LoadMeals(MealFilter),
    LoadMeal(MealId),
    LoadDailyStats(NaiveDate),
    LoadWeeklyStats(NaiveDate),
    LoadMonthlyStats { year: i32, month: u32 },
    RevertMeal(MealId),
    DeleteMeal(MealId),
    SetLanguage(Language),
    /// Close the detail view
    ClearSelection,
    DismissBanner,
    Shutdown,
}

/// Which request an event refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    VerifyEmail,
    Upload,
    Revert,
    Delete,
}

/// Notifications from the orchestrator
#[derive(Clone, Debug)]
pub enum AppEvent {
    /// State has changed (trigger UI repaint)
    StateChanged,
    /// A user-initiated request succeeded
    Completed(Operation),
    /// A user-initiated request failed
    Failed(Operation, MealVoiceError),
    /// An upload produced a meal
    MealLogged(MealId),
    /// Server refused an undo action; its control must disappear
    UndoRejected { meal_id: MealId, action: UndoAction },
    /// A meal was removed (reverted, deleted, or gone on the server)
    MealRemoved(MealId),
    /// The credential was rejected; the user is logged out
    SessionExpired,
    LoggedOut,
    Shutdown,
}
