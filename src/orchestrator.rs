//! Coordinates backend calls with the shared state
//!
//! The orchestrator thread owns a tokio runtime and spawns one task per
//! [`AppCommand`], so a slow upload never blocks a list refresh. Each task
//! writes its result into [`SharedAppState`] and emits [`AppEvent`]s.
//!
//! Error policy shared by every task:
//! - 401: drop the credential (memory and disk) and return to login
//! - 404 on a meal: remove it locally and refetch the list
//! - 400 on revert/delete: hide that action for the meal; the meal stays
//!
//! Tasks are bound to the session that was current when their command
//! arrived. Once logout or expiry ends that session, their results and
//! failures are dropped.

use crate::api::{
    AudioFile, LoginRequest, MealBackend, MealFilter, MealId, RegisterRequest, VoiceUpload,
};
use crate::error::{MealVoiceError, Result};
use crate::i18n::{tr, Text};
use crate::state::{
    AppCommand, AppEvent, AppState, AuthStatus, Operation, SharedAppState, UploadState,
};
use crate::storage::SessionStore;
use crate::undo::UndoAction;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Repaint hook invoked after every event
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Configuration for the orchestrator
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Command channel capacity
    pub channel_buffer_size: usize,
    /// Time allowed for in-flight requests on shutdown
    pub shutdown_timeout_ms: u64,
    /// Tokio worker threads
    pub worker_threads: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 100,
            shutdown_timeout_ms: 2000,
            worker_threads: 2,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size;
        self
    }

    pub fn with_shutdown_timeout_ms(mut self, timeout: u64) -> Self {
        self.shutdown_timeout_ms = timeout;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }
}

/// Handle for controlling the orchestrator from the UI or tests
pub struct OrchestratorHandle {
    command_tx: Sender<AppCommand>,
    event_rx: Receiver<AppEvent>,
    state: SharedAppState,
}

impl OrchestratorHandle {
    /// Send a command to the orchestrator
    pub fn send_command(&self, cmd: AppCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| MealVoiceError::ChannelError(format!("Failed to send command: {}", e)))
    }

    pub fn restore_session(&self) -> Result<()> {
        self.send_command(AppCommand::RestoreSession)
    }

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) -> Result<()> {
        self.send_command(AppCommand::Login {
            email: email.into(),
            password: password.into(),
        })
    }

    pub fn logout(&self) -> Result<()> {
        self.send_command(AppCommand::Logout)
    }

    pub fn upload(&self, file: AudioFile) -> Result<()> {
        self.send_command(AppCommand::UploadRecording(file))
    }

    pub fn load_meals(&self, filter: MealFilter) -> Result<()> {
        self.send_command(AppCommand::LoadMeals(filter))
    }

    pub fn revert(&self, meal_id: MealId) -> Result<()> {
        self.send_command(AppCommand::RevertMeal(meal_id))
    }

    pub fn delete(&self, meal_id: MealId) -> Result<()> {
        self.send_command(AppCommand::DeleteMeal(meal_id))
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.send_command(AppCommand::Shutdown)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<AppEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event, waiting at most `timeout`
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<AppEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Wait for the first event matching `pred`, discarding the others
    pub fn wait_for<F>(&self, timeout: Duration, mut pred: F) -> Option<AppEvent>
    where
        F: FnMut(&AppEvent) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.checked_duration_since(Instant::now())?;
            match self.event_rx.recv_timeout(left) {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Get the shared application state
    pub fn state(&self) -> &SharedAppState {
        &self.state
    }
}

/// Runs backend requests and folds their results into the shared state
pub struct Orchestrator {
    config: OrchestratorConfig,
    state: SharedAppState,
    backend: Arc<dyn MealBackend>,
    store: Option<SessionStore>,
    notifier: Option<Notifier>,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
}

impl Orchestrator {
    /// Create an orchestrator and the handle that controls it
    ///
    /// Nothing runs until [`Orchestrator::start`].
    pub fn new(
        config: OrchestratorConfig,
        backend: Arc<dyn MealBackend>,
    ) -> (Self, OrchestratorHandle) {
        Self::with_state(config, backend, SharedAppState::new())
    }

    /// Create an orchestrator writing into an existing state
    pub fn with_state(
        config: OrchestratorConfig,
        backend: Arc<dyn MealBackend>,
        state: SharedAppState,
    ) -> (Self, OrchestratorHandle) {
        let (command_tx, command_rx) = bounded(config.channel_buffer_size);
        let (event_tx, event_rx) = unbounded();

        let handle = OrchestratorHandle {
            command_tx,
            event_rx,
            state: state.clone(),
        };

        let orchestrator = Self {
            config,
            state,
            backend,
            store: None,
            notifier: None,
            command_rx,
            event_tx,
        };

        (orchestrator, handle)
    }

    /// Persist credentials and language in `store`
    ///
    /// The stored language applies immediately so the first frame is
    /// already translated.
    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.state.write().language = store.load().language;
        self.store = Some(store);
        self
    }

    /// Call `notify` after every emitted event (e.g. to request a repaint)
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notify));
        self
    }

    /// Start the orchestrator thread
    pub fn start(self) -> Result<JoinHandle<()>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .thread_name("mealvoice-io")
            .enable_all()
            .build()
            .map_err(|e| MealVoiceError::IOError(format!("Failed to start runtime: {}", e)))?;

        let shutdown_timeout = Duration::from_millis(self.config.shutdown_timeout_ms);
        let session = self.state.read().session;
        let worker = Worker {
            session,
            backend: self.backend,
            state: self.state,
            store: self.store,
            notifier: self.notifier,
            events: self.event_tx,
        };
        let command_rx = self.command_rx;

        thread::Builder::new()
            .name("orchestrator".into())
            .spawn(move || {
                info!("Orchestrator main loop starting");
                loop {
                    match command_rx.recv_timeout(Duration::from_millis(250)) {
                        Ok(AppCommand::Shutdown) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Ok(cmd) => {
                            debug!("Command: {:?}", CommandName(&cmd));
                            worker.begin(&cmd);
                            runtime.spawn(worker.for_current_session().handle(cmd));
                        }
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => {
                            info!("All handles dropped, stopping");
                            break;
                        }
                    }
                }
                runtime.shutdown_timeout(shutdown_timeout);
                worker.emit(AppEvent::Shutdown);
                info!("Orchestrator shutdown complete");
            })
            .map_err(|e| MealVoiceError::IOError(format!("Failed to spawn orchestrator: {}", e)))
    }
}

/// Logs a command without its payload (passwords, audio bytes)
struct CommandName<'a>(&'a AppCommand);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            AppCommand::RestoreSession => "RestoreSession",
            AppCommand::Login { .. } => "Login",
            AppCommand::Register(_) => "Register",
            AppCommand::VerifyEmail { .. } => "VerifyEmail",
            AppCommand::ResendVerification { .. } => "ResendVerification",
            AppCommand::Logout => "Logout",
            AppCommand::UploadRecording(_) => "UploadRecording",
            AppCommand::LoadDashboard => "LoadDashboard",
            AppCommand::LoadMeals(filter) => return write!(f, "LoadMeals({:?})", filter),
            AppCommand::LoadMeal(id) => return write!(f, "LoadMeal({})", id),
            AppCommand::LoadDailyStats(_) => "LoadDailyStats",
            AppCommand::LoadWeeklyStats(_) => "LoadWeeklyStats",
            AppCommand::LoadMonthlyStats { .. } => "LoadMonthlyStats",
            AppCommand::RevertMeal(id) => return write!(f, "RevertMeal({})", id),
            AppCommand::DeleteMeal(id) => return write!(f, "DeleteMeal({})", id),
            AppCommand::SetLanguage(_) => "SetLanguage",
            AppCommand::ClearSelection => "ClearSelection",
            AppCommand::DismissBanner => "DismissBanner",
            AppCommand::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
struct Worker {
    /// Session this task works for
    session: u64,
    backend: Arc<dyn MealBackend>,
    state: SharedAppState,
    store: Option<SessionStore>,
    notifier: Option<Notifier>,
    events: Sender<AppEvent>,
}

impl Worker {
    fn emit(&self, event: AppEvent) {
        let _ = self.events.send(event);
        if let Some(notify) = &self.notifier {
            notify();
        }
    }

    fn changed(&self) {
        self.emit(AppEvent::StateChanged);
    }

    fn for_current_session(&self) -> Self {
        Self {
            session: self.state.read().session,
            ..self.clone()
        }
    }

    /// True once logout or expiry ended the session this task belongs to
    fn ended(&self) -> bool {
        self.state.read().session != self.session
    }

    /// Apply `apply` unless the task's session has ended
    fn update(&self, apply: impl FnOnce(&mut AppState)) {
        {
            let mut state = self.state.write();
            if state.session != self.session {
                debug!("Dropping update from an ended session");
                return;
            }
            apply(&mut state);
        }
        self.changed();
    }

    /// Synchronous bookkeeping done in command order, before the task runs
    ///
    /// Recording the requested scope here makes the latest request win even
    /// when responses arrive out of order.
    fn begin(&self, cmd: &AppCommand) {
        let mut state = self.state.write();
        match cmd {
            AppCommand::LoadMeals(filter) => {
                state.meals.filter = *filter;
                state.meals.loading = true;
                state.meals.error = None;
            }
            AppCommand::UploadRecording(_) => {
                state.recording.upload = UploadState::Uploading;
                state.recording.error = None;
            }
            // Ends the session before any later command is bound to it
            AppCommand::Logout => state.clear_session(),
            _ => {}
        }
    }

    async fn handle(self, cmd: AppCommand) {
        match cmd {
            AppCommand::RestoreSession => self.restore_session().await,
            AppCommand::Login { email, password } => self.login(email, password).await,
            AppCommand::Register(request) => self.register(request).await,
            AppCommand::VerifyEmail { key } => self.verify_email(key).await,
            AppCommand::ResendVerification { email } => self.resend_verification(email).await,
            AppCommand::Logout => self.logout().await,
            AppCommand::UploadRecording(file) => self.upload(file).await,
            AppCommand::LoadDashboard => self.load_dashboard(false).await,
            AppCommand::LoadMeals(filter) => self.load_meals(filter).await,
            AppCommand::LoadMeal(id) => self.load_meal(id).await,
            AppCommand::LoadDailyStats(date) => self.load_daily(date).await,
            AppCommand::LoadWeeklyStats(start) => self.load_weekly(start).await,
            AppCommand::LoadMonthlyStats { year, month } => self.load_monthly(year, month).await,
            AppCommand::RevertMeal(id) => self.undo(id, UndoAction::Revert).await,
            AppCommand::DeleteMeal(id) => self.undo(id, UndoAction::Delete).await,
            AppCommand::SetLanguage(language) => {
                self.update(|s| s.language = language);
                if let Some(store) = &self.store {
                    if let Err(e) = store.save_language(language) {
                        warn!("Failed to persist language: {}", e);
                    }
                }
            }
            AppCommand::ClearSelection => self.update(|s| s.meals.selected = None),
            AppCommand::DismissBanner => self.update(AppState::clear_banner),
            AppCommand::Shutdown => {}
        }
    }

    // === Error policy ===

    /// Forget the credential everywhere and return to the login screen
    fn expire_session(&self) {
        warn!("Credential rejected, logging out");
        self.backend.set_token(None);
        self.update(|s| {
            s.clear_session();
            let message = MealVoiceError::Unauthorized.message_in(s.language);
            s.set_banner(message);
        });
        self.clear_stored_auth();
        self.emit(AppEvent::SessionExpired);
    }

    /// Route a failure: 401 logs out, anything else goes to `apply`
    fn report(&self, err: &MealVoiceError, apply: impl FnOnce(&mut AppState, String)) {
        if self.ended() {
            debug!("Ignoring failure from an ended session: {}", err);
            return;
        }
        if err.is_unauthorized() {
            self.expire_session();
            return;
        }
        warn!("Request failed: {}", err);
        self.update(|s| {
            let message = err.message_in(s.language);
            apply(s, message)
        });
    }

    fn clear_stored_auth(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear_auth() {
                error!("Failed to clear stored credential: {}", e);
            }
        }
    }

    // === Auth ===

    async fn restore_session(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let session = store.load();
        let Some(token) = session.token else {
            debug!("No stored credential");
            return;
        };

        info!("Restoring stored session");
        self.backend.set_token(Some(token.clone()));
        self.update(|s| {
            s.auth.status = AuthStatus::Restoring;
            s.auth.token = Some(token.clone());
            s.auth.user = session.user.clone();
        });

        match self.backend.profile().await {
            Ok(user) => {
                if let Err(e) = store.save_auth(&token, &user) {
                    warn!("Failed to persist session: {}", e);
                }
                self.update(|s| {
                    s.auth.status = AuthStatus::LoggedIn;
                    s.auth.user = Some(user);
                });
                self.load_home().await;
            }
            Err(MealVoiceError::Unauthorized) => {
                info!("Stored credential is no longer valid");
                self.backend.set_token(None);
                self.update(AppState::clear_session);
                self.clear_stored_auth();
                self.emit(AppEvent::LoggedOut);
            }
            Err(e) => {
                // Keep the cached identity; the next call will tell.
                warn!("Could not validate stored session: {}", e);
                self.update(|s| {
                    s.auth.status = AuthStatus::LoggedIn;
                    let message = e.message_in(s.language);
                    s.set_banner(message);
                });
            }
        }
    }

    async fn login(&self, email: String, password: String) {
        self.update(|s| {
            s.auth.status = AuthStatus::LoggingIn;
            s.auth.clear_feedback();
        });

        let request = LoginRequest {
            email: email.trim().to_string(),
            password,
        };
        let result = async {
            let token = self.backend.login(&request).await?;
            self.backend.set_token(Some(token.key.clone()));
            let user = self.backend.profile().await?;
            Ok::<_, MealVoiceError>((token.key, user))
        }
        .await;

        match result {
            Ok((token, user)) => {
                info!("Logged in as {}", user.email);
                if let Some(store) = &self.store {
                    if let Err(e) = store.save_auth(&token, &user) {
                        warn!("Failed to persist session: {}", e);
                    }
                }
                self.update(|s| {
                    s.auth.status = AuthStatus::LoggedIn;
                    s.auth.token = Some(token);
                    s.auth.user = Some(user);
                });
                self.emit(AppEvent::Completed(Operation::Login));
                self.load_home().await;
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.backend.set_token(None);
                self.update(|s| {
                    s.auth.status = AuthStatus::LoggedOut;
                    apply_form_error(s, &e);
                });
                self.emit(AppEvent::Failed(Operation::Login, e));
            }
        }
    }

    async fn register(&self, request: RegisterRequest) {
        self.update(|s| {
            s.auth.status = AuthStatus::Registering;
            s.auth.clear_feedback();
        });

        match self.backend.register(&request).await {
            Ok(detail) => {
                info!("Registered {}", request.email);
                self.update(|s| {
                    s.auth.status = AuthStatus::AwaitingVerification {
                        email: request.email.clone(),
                    };
                    s.auth.notice = detail;
                });
                self.emit(AppEvent::Completed(Operation::Register));
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                self.update(|s| {
                    s.auth.status = AuthStatus::LoggedOut;
                    apply_form_error(s, &e);
                });
                self.emit(AppEvent::Failed(Operation::Register, e));
            }
        }
    }

    async fn verify_email(&self, key: String) {
        self.update(|s| s.auth.clear_feedback());
        match self.backend.verify_email(key.trim()).await {
            Ok(()) => {
                self.update(|s| {
                    s.auth.status = AuthStatus::LoggedOut;
                    s.auth.notice = Some(tr(s.language, Text::EmailVerified).to_string());
                });
                self.emit(AppEvent::Completed(Operation::VerifyEmail));
            }
            Err(e) => {
                self.update(|s| apply_form_error(s, &e));
                self.emit(AppEvent::Failed(Operation::VerifyEmail, e));
            }
        }
    }

    async fn resend_verification(&self, email: String) {
        match self.backend.resend_email(&email).await {
            Ok(()) => self.update(|s| {
                s.auth.error = None;
                s.auth.notice = Some(format!(
                    "{} {}",
                    tr(s.language, Text::VerificationResent),
                    email
                ));
            }),
            Err(e) => self.update(|s| apply_form_error(s, &e)),
        }
    }

    async fn logout(&self) {
        if let Err(e) = self.backend.logout().await {
            debug!("Server-side logout failed: {}", e);
        }
        if self.state.read().auth.token.is_some() {
            debug!("Signed in again before logout finished");
        } else {
            self.backend.set_token(None);
            self.clear_stored_auth();
        }
        self.changed();
        info!("Logged out");
        self.emit(AppEvent::LoggedOut);
    }

    // === Meals ===

    async fn upload(&self, file: AudioFile) {
        info!(
            "Uploading {} ({:.1}s, {} bytes)",
            file.file_name,
            file.duration_secs,
            file.bytes.len()
        );
        let upload = VoiceUpload::now(file);

        let result = self.backend.upload_voice(&upload).await;
        if self.ended() {
            debug!("Upload finished after the session ended");
            return;
        }
        match result {
            Ok(meal) => {
                let id = meal.id;
                info!("Meal {} logged", id);
                self.update(|s| {
                    s.recording.upload = UploadState::Idle;
                    s.recording.last_meal = Some(id);
                    s.insert_meal(meal);
                });
                self.emit(AppEvent::MealLogged(id));
                self.emit(AppEvent::Completed(Operation::Upload));
                self.refresh_in_background();
            }
            Err(e) => {
                self.update(|s| s.recording.upload = UploadState::Idle);
                self.report(&e, |s, message| s.recording.error = Some(message));
                self.emit(AppEvent::Failed(Operation::Upload, e));
            }
        }
    }

    async fn undo(&self, id: MealId, action: UndoAction) {
        let operation = match action {
            UndoAction::Revert => Operation::Revert,
            UndoAction::Delete => Operation::Delete,
        };
        let result = match action {
            UndoAction::Revert => self.backend.revert_meal(id).await,
            UndoAction::Delete => self.backend.delete_meal(id).await,
        };
        if self.ended() {
            return;
        }

        match result {
            Ok(()) => {
                info!("Meal {} {:?} succeeded", id, action);
                self.update(|s| {
                    s.remove_meal(id);
                });
                self.emit(AppEvent::MealRemoved(id));
                self.emit(AppEvent::Completed(operation));
                self.refresh_in_background();
            }
            Err(ref e @ (MealVoiceError::Rejected(_) | MealVoiceError::Validation { .. })) => {
                info!("Server refused {:?} for meal {}: {}", action, id, e);
                self.update(|s| {
                    let message = e.message_in(s.language);
                    s.set_banner(message);
                });
                self.emit(AppEvent::UndoRejected {
                    meal_id: id,
                    action,
                });
                self.emit(AppEvent::Failed(operation, e.clone()));
            }
            Err(MealVoiceError::NotFound) => {
                info!("Meal {} is gone on the server", id);
                self.update(|s| {
                    s.remove_meal(id);
                });
                self.emit(AppEvent::MealRemoved(id));
                self.emit(AppEvent::Failed(operation, MealVoiceError::NotFound));
                self.reload_meals().await;
            }
            Err(e) => {
                self.report(&e, |s, message| s.set_banner(message));
                self.emit(AppEvent::Failed(operation, e));
            }
        }
    }

    async fn load_meals(&self, filter: MealFilter) {
        let result = self.backend.list_meals(&filter).await;
        if self.ended() {
            debug!("Discarding meal list from an ended session");
            return;
        }
        if self.state.read().meals.filter != filter {
            debug!("Discarding stale meal list for {:?}", filter);
            return;
        }
        match result {
            Ok(meals) => self.update(|s| {
                s.meals.items = meals;
                s.meals.loading = false;
            }),
            Err(e) => {
                self.update(|s| s.meals.loading = false);
                self.report(&e, |s, message| s.meals.error = Some(message));
            }
        }
    }

    /// Refetch the list currently on screen
    async fn reload_meals(&self) {
        if self.ended() {
            return;
        }
        let filter = self.state.read().meals.filter;
        self.begin(&AppCommand::LoadMeals(filter));
        self.load_meals(filter).await;
    }

    async fn load_meal(&self, id: MealId) {
        let result = self.backend.get_meal(id).await;
        if self.ended() {
            return;
        }
        match result {
            Ok(meal) => self.update(|s| s.meals.selected = Some(meal)),
            Err(MealVoiceError::NotFound) => {
                info!("Meal {} is gone on the server", id);
                self.update(|s| {
                    s.remove_meal(id);
                    let message = MealVoiceError::NotFound.message_in(s.language);
                    s.set_banner(message);
                });
                self.emit(AppEvent::MealRemoved(id));
                self.reload_meals().await;
            }
            Err(e) => self.report(&e, |s, message| s.set_banner(message)),
        }
    }

    // === Stats ===

    /// Dashboard plus today's stats, after login
    async fn load_home(&self) {
        self.load_dashboard(false).await;
        self.load_daily(chrono::Local::now().date_naive()).await;
    }

    /// Refresh the dashboard without surfacing errors
    fn refresh_in_background(&self) {
        let worker = self.clone();
        tokio::spawn(async move { worker.load_dashboard(true).await });
    }

    async fn load_dashboard(&self, quiet: bool) {
        if !quiet {
            self.update(|s| s.stats.loading = true);
        }
        match self.backend.dashboard().await {
            Ok(dashboard) => self.update(|s| {
                s.stats.dashboard = Some(dashboard);
                s.stats.loading = false;
                s.stats.error = None;
            }),
            Err(e) if quiet && !e.is_unauthorized() => {
                debug!("Background dashboard refresh failed: {}", e);
            }
            Err(e) => {
                self.update(|s| s.stats.loading = false);
                self.report(&e, |s, message| s.stats.error = Some(message));
            }
        }
    }

    async fn load_daily(&self, date: chrono::NaiveDate) {
        match self.backend.daily_stats(date).await {
            Ok(daily) => self.update(|s| s.stats.daily = Some(daily)),
            Err(e) => self.report(&e, |s, message| s.stats.error = Some(message)),
        }
    }

    async fn load_weekly(&self, start: chrono::NaiveDate) {
        match self.backend.weekly_stats(start).await {
            Ok(weekly) => self.update(|s| s.stats.weekly = Some(weekly)),
            Err(e) => self.report(&e, |s, message| s.stats.error = Some(message)),
        }
    }

    async fn load_monthly(&self, year: i32, month: u32) {
        match self.backend.monthly_stats(year, month).await {
            Ok(monthly) => self.update(|s| s.stats.monthly = Some(monthly)),
            Err(e) => self.report(&e, |s, message| s.stats.error = Some(message)),
        }
    }
}

/// Show a form failure: field messages inline, the rest as the form error
fn apply_form_error(state: &mut AppState, err: &MealVoiceError) {
    state.auth.field_errors = err.field_errors().cloned().unwrap_or_default();
    state.auth.error = match err {
        MealVoiceError::Unauthorized => {
            Some(tr(state.language, Text::InvalidCredentials).to_string())
        }
        MealVoiceError::Validation { fields, .. } if !fields.is_empty() => None,
        other => Some(other.message_in(state.language)),
    };
}
