//! Main application struct and eframe integration
//!
//! [`MealVoiceApp`] owns everything that must live on the UI thread: the
//! capture device, the undo countdowns and the screen navigation. Backend
//! work goes through the [`OrchestratorHandle`]; the app reads the shared
//! state once per frame and renders from that snapshot.

use crate::api::{MealBackend, MealId};
use crate::audio::{CaptureOutcome, VoiceCapture};
use crate::config::{AppConfig, RecordingConfig};
use crate::error::{MealVoiceError, Result};
use crate::i18n::{tr, Language, Text};
use crate::orchestrator::{Orchestrator, OrchestratorConfig, OrchestratorHandle};
use crate::state::{AppCommand, AppEvent, AppState, AuthStatus, Operation};
use crate::storage::SessionStore;
use crate::ui::components::{
    banner, confirm_dialog, AuthAction, ConfirmResult, DashboardView, DetailAction, LoginForm,
    MealAction, MealDetail, PendingUndo, RecordButton, RecordInput, RecordView, RegisterForm,
    Timeline, TimelineAction, TimelineView, VerifyForm,
};
use crate::ui::theme::Theme;
use crate::undo::{UndoAction, UndoTracker};
use chrono::Utc;
use egui::{CentralPanel, RichText, TopBottomPanel};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};

/// Poll interval for captured audio while recording
const CAPTURE_POLL: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthScreen {
    Login,
    Register,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Dashboard,
    Timeline,
}

/// Main Mealvoice application
pub struct MealVoiceApp {
    handle: OrchestratorHandle,
    orchestrator: Option<JoinHandle<()>>,
    theme: Theme,
    capture: VoiceCapture,
    undo: UndoTracker,
    /// Context the undo ticker repaints; filled on the first frame
    repaint: Arc<Mutex<Option<egui::Context>>>,

    auth_screen: AuthScreen,
    tab: Tab,
    /// Meal shown in detail, over the current tab
    detail: Option<MealId>,
    login: LoginForm,
    register: RegisterForm,
    verify: VerifyForm,
    timeline: TimelineView,
    pending: Option<PendingUndo>,
    capture_error: Option<MealVoiceError>,
}

impl MealVoiceApp {
    /// Create the application, start the orchestrator and restore a stored session
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        backend: Arc<dyn MealBackend>,
        store: SessionStore,
    ) -> Result<Self> {
        let theme = Theme::default();
        theme.apply(&cc.egui_ctx);

        let ctx = cc.egui_ctx.clone();
        let (orchestrator, handle) = Orchestrator::new(OrchestratorConfig::default(), backend);
        let thread = orchestrator
            .with_store(store)
            .with_notifier(move || ctx.request_repaint())
            .start()?;
        handle.restore_session()?;

        let mut app = Self::from_parts(handle, default_capture(config.recording));
        app.theme = theme;
        app.orchestrator = Some(thread);
        Ok(app)
    }

    /// Assemble the app around an already running orchestrator
    pub fn from_parts(handle: OrchestratorHandle, capture: VoiceCapture) -> Self {
        let repaint: Arc<Mutex<Option<egui::Context>>> = Arc::default();
        let undo = UndoTracker::new({
            let repaint = Arc::clone(&repaint);
            move || {
                if let Some(ctx) = repaint.lock().as_ref() {
                    ctx.request_repaint();
                }
            }
        });

        Self {
            handle,
            orchestrator: None,
            theme: Theme::default(),
            capture,
            undo,
            repaint,
            auth_screen: AuthScreen::Login,
            tab: Tab::Dashboard,
            detail: None,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            verify: VerifyForm::default(),
            timeline: TimelineView::default(),
            pending: None,
            capture_error: None,
        }
    }

    pub fn handle(&self) -> &OrchestratorHandle {
        &self.handle
    }

    pub fn capture(&self) -> &VoiceCapture {
        &self.capture
    }

    pub fn undo(&self) -> &UndoTracker {
        &self.undo
    }

    /// Render one frame
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.repaint.lock().get_or_insert_with(|| ctx.clone());

        self.drain_events();
        let state = self.handle.state().snapshot();

        if !state.auth.status.is_logged_in() {
            self.capture.cancel();
            self.show_auth(ctx, &state);
            return;
        }

        self.undo.sync(state.visible_meals(), Utc::now());
        self.poll_capture(ctx);

        self.show_header(ctx, &state);
        self.show_record_panel(ctx, &state);
        self.show_content(ctx, &state);
        self.show_confirm(ctx, state.language);
    }

    fn send(&self, cmd: AppCommand) {
        if let Err(e) = self.handle.send_command(cmd) {
            error!("Failed to send command: {}", e);
        }
    }

    fn drain_events(&mut self) {
        let now = Utc::now();
        while let Some(event) = self.handle.try_recv_event() {
            match event {
                AppEvent::UndoRejected { meal_id, action } => {
                    self.undo.reject(meal_id, action, now);
                    if self.pending == Some(PendingUndo { meal_id, action }) {
                        self.pending = None;
                    }
                }
                AppEvent::MealRemoved(id) => {
                    self.undo.remove(id, now);
                    if self.pending.is_some_and(|p| p.meal_id == id) {
                        self.pending = None;
                    }
                    if self.detail == Some(id) {
                        self.detail = None;
                    }
                }
                AppEvent::MealLogged(_) => self.capture_error = None,
                AppEvent::SessionExpired | AppEvent::LoggedOut => {
                    self.capture.cancel();
                    self.pending = None;
                    self.detail = None;
                    self.tab = Tab::Dashboard;
                    self.auth_screen = AuthScreen::Login;
                    self.login.clear_secret();
                    self.capture_error = None;
                }
                AppEvent::Completed(Operation::Login) => {
                    self.login.clear_secret();
                }
                AppEvent::Completed(Operation::Register) => {
                    self.register = RegisterForm::default();
                }
                AppEvent::Completed(Operation::VerifyEmail) => {
                    self.verify = VerifyForm::default();
                    self.auth_screen = AuthScreen::Login;
                }
                _ => {}
            }
        }
    }

    // === Capture ===

    fn poll_capture(&mut self, ctx: &egui::Context) {
        if !self.capture.is_recording() {
            return;
        }
        let outcome = self.capture.poll();
        self.apply_capture(outcome);
        ctx.request_repaint_after(CAPTURE_POLL);
    }

    fn on_record_input(&mut self, input: RecordInput) {
        let outcome = match input {
            RecordInput::Press => self.capture.press(),
            RecordInput::Release => self.capture.release(),
            RecordInput::Click => self.capture.click(),
            RecordInput::Cancel => {
                self.capture.cancel();
                Ok(CaptureOutcome::None)
            }
            RecordInput::ModeChanged(mode) => {
                self.capture.set_mode(mode);
                Ok(CaptureOutcome::None)
            }
        };
        self.apply_capture(outcome);
    }

    fn apply_capture(&mut self, outcome: Result<CaptureOutcome>) {
        match outcome {
            Ok(CaptureOutcome::None) => {}
            Ok(CaptureOutcome::Started) => self.capture_error = None,
            Ok(CaptureOutcome::Finished { file, reason }) => {
                info!("[AUDIO] Recording finished ({:?}), uploading", reason);
                if let Err(e) = self.handle.upload(file) {
                    self.capture_error = Some(e);
                }
            }
            Err(e) => self.capture_error = Some(e),
        }
    }

    // === Navigation ===

    fn show_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.detail = None;
        match tab {
            Tab::Dashboard => self.send(AppCommand::LoadDashboard),
            Tab::Timeline => self.navigate(self.timeline),
        }
    }

    fn navigate(&mut self, view: TimelineView) {
        self.timeline = view;
        self.send(AppCommand::LoadMeals(view.filter()));
        self.send(view.stats_command());
    }

    fn on_meal_action(&mut self, action: MealAction) {
        match action {
            MealAction::Open(id) => {
                self.detail = Some(id);
                self.send(AppCommand::LoadMeal(id));
            }
            MealAction::Request(meal_id, action) => {
                if self.undo.is_open(meal_id, action, Utc::now()) {
                    self.pending = Some(PendingUndo { meal_id, action });
                }
            }
        }
    }

    fn on_auth_action(&mut self, action: AuthAction) {
        match action {
            AuthAction::Login { email, password } => {
                self.send(AppCommand::Login { email, password })
            }
            AuthAction::Register(request) => self.send(AppCommand::Register(request)),
            AuthAction::Verify(key) => self.send(AppCommand::VerifyEmail { key }),
            AuthAction::Resend(email) => self.send(AppCommand::ResendVerification { email }),
            AuthAction::ShowRegister => self.auth_screen = AuthScreen::Register,
            AuthAction::ShowLogin => {
                self.auth_screen = AuthScreen::Login;
                let mut state = self.handle.state().write();
                if matches!(state.auth.status, AuthStatus::AwaitingVerification { .. }) {
                    state.auth.status = AuthStatus::LoggedOut;
                }
                state.auth.clear_feedback();
            }
        }
    }

    // === Panels ===

    fn show_auth(&mut self, ctx: &egui::Context, state: &AppState) {
        let lang = state.language;
        let mut dismissed = false;
        let mut language = None;

        let action = CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_lg),
            )
            .show(ctx, |ui| {
                if let Some(message) = &state.banner {
                    dismissed = banner(ui, &self.theme, lang, message);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    language = language_picker(ui, lang);
                });

                ui.vertical_centered(|ui| {
                    ui.set_max_width(320.0);
                    ui.label(
                        RichText::new(tr(lang, Text::AppTitle))
                            .size(32.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.label(RichText::new(tr(lang, Text::Tagline)).color(self.theme.text_muted));
                    ui.add_space(self.theme.spacing_lg);

                    if state.auth.status == AuthStatus::Restoring {
                        ui.spinner();
                        ui.label(tr(lang, Text::Loading));
                        return None;
                    }
                    if matches!(state.auth.status, AuthStatus::AwaitingVerification { .. }) {
                        return self.verify.show(ui, &self.theme, lang, &state.auth);
                    }
                    match self.auth_screen {
                        AuthScreen::Login => self.login.show(ui, &self.theme, lang, &state.auth),
                        AuthScreen::Register => {
                            self.register.show(ui, &self.theme, lang, &state.auth)
                        }
                    }
                })
                .inner
            })
            .inner;

        if dismissed {
            self.send(AppCommand::DismissBanner);
        }
        if let Some(language) = language {
            self.send(AppCommand::SetLanguage(language));
        }
        if let Some(action) = action {
            self.on_auth_action(action);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context, state: &AppState) {
        let lang = state.language;
        let mut tab = None;
        let mut logout = false;
        let mut language = None;

        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(tr(lang, Text::AppTitle))
                            .size(20.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.add_space(self.theme.spacing);

                    for (candidate, text) in [
                        (Tab::Dashboard, Text::Dashboard),
                        (Tab::Timeline, Text::Timeline),
                    ] {
                        let selected = self.tab == candidate && self.detail.is_none();
                        if ui.selectable_label(selected, tr(lang, text)).clicked() {
                            tab = Some(candidate);
                        }
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        logout = ui.button(tr(lang, Text::Logout)).clicked();
                        if let Some(user) = &state.auth.user {
                            ui.label(
                                RichText::new(user.display_name()).color(self.theme.text_muted),
                            );
                        }
                        language = language_picker(ui, lang);
                    });
                });
            });

        if let Some(language) = language {
            self.send(AppCommand::SetLanguage(language));
        }
        if logout {
            self.capture.cancel();
            self.send(AppCommand::Logout);
        } else if let Some(tab) = tab {
            self.show_tab(tab);
        }
    }

    fn show_record_panel(&mut self, ctx: &egui::Context, state: &AppState) {
        let view = RecordView {
            mode: self.capture.mode(),
            recording: self.capture.is_recording(),
            uploading: state.recording.upload.is_uploading(),
            elapsed: self.capture.elapsed(),
            remaining: self.capture.remaining(),
            levels: self
                .capture
                .levels()
                .map(|levels| levels.levels())
                .unwrap_or_default(),
            error: self
                .capture_error
                .as_ref()
                .map(|e| e.message_in(state.language))
                .or_else(|| state.recording.error.clone()),
        };

        let inputs = TopBottomPanel::bottom("record_panel")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                RecordButton::new(&view, &self.theme, state.language).show(ui)
            })
            .inner;

        for input in inputs {
            self.on_record_input(input);
        }
    }

    fn show_content(&mut self, ctx: &egui::Context, state: &AppState) {
        let lang = state.language;
        let now = Utc::now();

        enum Intent {
            Meal(MealAction),
            Timeline(TimelineView),
            Back,
            DismissBanner,
        }

        let intent = CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                let mut intent = None;
                if let Some(message) = &state.banner {
                    if banner(ui, &self.theme, lang, message) {
                        intent = Some(Intent::DismissBanner);
                    }
                    ui.add_space(self.theme.spacing_sm);
                }

                let undo = &self.undo;
                let view = |id: MealId| undo.view(id, now);

                egui::ScrollArea::vertical()
                    .id_salt("content")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        if let Some(id) = self.detail {
                            let meal = state
                                .meals
                                .selected
                                .as_ref()
                                .filter(|m| m.id == id)
                                .or_else(|| state.find_meal(id));
                            match meal {
                                Some(meal) => {
                                    match MealDetail::new(meal, view(id), &self.theme, lang).show(ui) {
                                        Some(DetailAction::Back) => intent = Some(Intent::Back),
                                        Some(DetailAction::Meal(a)) => intent = Some(Intent::Meal(a)),
                                        None => {}
                                    }
                                }
                                None => {
                                    if ui.button(tr(lang, Text::Back)).clicked() {
                                        intent = Some(Intent::Back);
                                    }
                                    ui.spinner();
                                }
                            }
                            return;
                        }

                        let action = match self.tab {
                            Tab::Dashboard => DashboardView::new(&state.stats, &self.theme, lang)
                                .show(ui, view)
                                .map(Intent::Meal),
                            Tab::Timeline => {
                                Timeline::new(self.timeline, &state.meals, &state.stats, &self.theme, lang)
                                    .show(ui, view)
                                    .map(|a| match a {
                                        TimelineAction::Navigate(v) => Intent::Timeline(v),
                                        TimelineAction::Meal(m) => Intent::Meal(m),
                                    })
                            }
                        };
                        if action.is_some() {
                            intent = action;
                        }
                    });
                intent
            })
            .inner;

        match intent {
            Some(Intent::Meal(action)) => self.on_meal_action(action),
            Some(Intent::Timeline(view)) => self.navigate(view),
            Some(Intent::Back) => {
                self.detail = None;
                self.send(AppCommand::ClearSelection);
            }
            Some(Intent::DismissBanner) => self.send(AppCommand::DismissBanner),
            None => {}
        }
    }

    fn show_confirm(&mut self, ctx: &egui::Context, language: Language) {
        let Some(pending) = self.pending else {
            return;
        };
        // The window may close while the dialog is up.
        if !self.undo.is_open(pending.meal_id, pending.action, Utc::now()) {
            self.pending = None;
            return;
        }

        match confirm_dialog(ctx, &self.theme, language, pending) {
            Some(ConfirmResult::Confirmed) => {
                self.pending = None;
                let cmd = match pending.action {
                    UndoAction::Revert => AppCommand::RevertMeal(pending.meal_id),
                    UndoAction::Delete => AppCommand::DeleteMeal(pending.meal_id),
                };
                self.send(cmd);
            }
            Some(ConfirmResult::Cancelled) => self.pending = None,
            None => {}
        }
    }
}

/// Language selector; returns the new choice when it changed
fn language_picker(ui: &mut egui::Ui, current: Language) -> Option<Language> {
    let mut selected = current;
    egui::ComboBox::from_id_salt("language")
        .selected_text(selected.native_name())
        .show_ui(ui, |ui| {
            for language in Language::ALL {
                ui.selectable_value(&mut selected, language, language.native_name());
            }
        });
    (selected != current).then_some(selected)
}

/// Capture from the default microphone when device I/O is compiled in
fn default_capture(config: RecordingConfig) -> VoiceCapture {
    #[cfg(feature = "audio-io")]
    {
        VoiceCapture::with_default_device(config)
    }
    #[cfg(not(feature = "audio-io"))]
    {
        VoiceCapture::new(
            config,
            Box::new(|| Err(MealVoiceError::NoMicrophone)),
        )
    }
}

impl eframe::App for MealVoiceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Mealvoice shutting down");
        self.capture.cancel();
    }
}

impl Drop for MealVoiceApp {
    fn drop(&mut self) {
        self.capture.cancel();
        if let Some(thread) = self.orchestrator.take() {
            let _ = self.handle.shutdown();
            if thread.join().is_err() {
                error!("Orchestrator thread panicked");
            }
        }
    }
}
