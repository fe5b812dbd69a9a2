//! End-to-end flows through the orchestrator with an in-memory backend

mod common;

use chrono::Duration as ChronoDuration;
use common::{logged_in_state, meal, wait_until, FakeBackend, PASSWORD, TOKEN};
use mealvoice::api::{DailyStats, Meal, MealBackend, MealFilter, MealId, RegisterRequest};
use mealvoice::audio::{CaptureMode, CaptureOutcome, ScriptedSource, StopReason, VoiceCapture};
use mealvoice::config::RecordingConfig;
use mealvoice::i18n::Language;
use mealvoice::state::{AuthStatus, Operation};
use mealvoice::storage::SessionStore;
use mealvoice::undo::UndoAction;
use mealvoice::{
    AppCommand, AppEvent, MealVoiceError, Orchestrator, OrchestratorConfig, OrchestratorHandle,
    SharedAppState,
};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

struct Running {
    handle: OrchestratorHandle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for Running {
    fn drop(&mut self) {
        let _ = self.handle.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn start(backend: Arc<FakeBackend>, state: SharedAppState, store: Option<SessionStore>) -> Running {
    let (orchestrator, handle) =
        Orchestrator::with_state(OrchestratorConfig::default(), backend, state);
    let orchestrator = match store {
        Some(store) => orchestrator.with_store(store),
        None => orchestrator,
    };
    let thread = orchestrator.start().unwrap();
    Running {
        handle,
        thread: Some(thread),
    }
}

fn logged_in(backend: Arc<FakeBackend>) -> Running {
    backend.set_token(Some(TOKEN.into()));
    let meals = backend.state.lock().meals.clone();
    start(backend, logged_in_state(meals), None)
}

fn store() -> (tempfile::TempDir, SessionStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    (dir, store)
}

#[test]
fn test_login_persists_token_and_loads_dashboard() {
    let (_dir, store) = store();
    let backend = Arc::new(FakeBackend::with_meals(vec![meal(1, ChronoDuration::minutes(5))]));
    let app = start(backend, SharedAppState::new(), Some(store.clone()));

    app.handle.login("ana@example.com", PASSWORD).unwrap();
    wait_until(&app.handle, TIMEOUT, |s| {
        s.auth.status == AuthStatus::LoggedIn && s.stats.dashboard.is_some()
    });

    let persisted = store.load();
    assert_eq!(persisted.token.as_deref(), Some(TOKEN));
    assert_eq!(persisted.user.unwrap().email, "ana@example.com");
    let state = app.handle.state().snapshot();
    let recent: Vec<_> = state.visible_meals().iter().map(|m| m.id).collect();
    assert_eq!(recent, vec![1]);
}

#[test]
fn test_login_failure_shows_form_error() {
    let backend = Arc::new(FakeBackend::default());
    let app = start(backend, SharedAppState::new(), None);

    app.handle.login("ana@example.com", "wrong").unwrap();
    let event = app
        .handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::Failed(Operation::Login, _)))
        .expect("login failure");

    assert!(matches!(event, AppEvent::Failed(_, MealVoiceError::Rejected(_))));
    let state = app.handle.state().snapshot();
    assert_eq!(state.auth.status, AuthStatus::LoggedOut);
    assert_eq!(
        state.auth.error.as_deref(),
        Some("Unable to log in with provided credentials.")
    );
}

#[test]
fn test_restore_session_from_store() {
    let (_dir, store) = store();
    store.save_auth(TOKEN, &common::user()).unwrap();
    let backend = Arc::new(FakeBackend::default());
    let app = start(backend, SharedAppState::new(), Some(store));

    app.handle.restore_session().unwrap();
    wait_until(&app.handle, TIMEOUT, |s| s.auth.status == AuthStatus::LoggedIn);
    assert_eq!(app.handle.state().token().as_deref(), Some(TOKEN));
}

#[test]
fn test_stale_stored_token_is_cleared() {
    let (_dir, store) = store();
    store.save_auth("tok-revoked", &common::user()).unwrap();
    let backend = Arc::new(FakeBackend::default());
    let app = start(backend, SharedAppState::new(), Some(store.clone()));

    app.handle.restore_session().unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::LoggedOut))
        .expect("logged out");

    assert!(!app.handle.state().is_logged_in());
    assert!(store.load().token.is_none());
}

#[test]
fn test_unauthorized_dashboard_logs_out_everywhere() {
    let (_dir, store) = store();
    store.save_auth(TOKEN, &common::user()).unwrap();
    let backend = Arc::new(FakeBackend::default());
    backend.state.lock().dashboard_error = Some(MealVoiceError::Unauthorized);
    let app = start(backend.clone(), SharedAppState::new(), Some(store.clone()));

    app.handle.restore_session().unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::SessionExpired))
        .expect("session expired");

    let state = app.handle.state().snapshot();
    assert_eq!(state.auth.status, AuthStatus::LoggedOut);
    assert!(state.auth.token.is_none());
    assert!(state.banner.is_some());
    assert!(store.load().token.is_none());
    assert!(backend.state.lock().token.is_none());
}

#[test]
fn test_rejected_revert_keeps_meal() {
    let backend = Arc::new(FakeBackend::with_meals(vec![meal(1, ChronoDuration::seconds(2))]));
    backend.state.lock().revert_error =
        Some(MealVoiceError::Rejected("Revert window has expired".into()));
    let app = logged_in(backend);

    app.handle.revert(1).unwrap();
    let event = app
        .handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::UndoRejected { .. }))
        .expect("rejection");

    assert!(matches!(
        event,
        AppEvent::UndoRejected {
            meal_id: 1,
            action: UndoAction::Revert
        }
    ));
    assert_eq!(app.handle.state().meal_ids(), vec![1]);
    assert_eq!(
        app.handle.state().banner().as_deref(),
        Some("Revert window has expired")
    );
}

#[test]
fn test_delete_removes_meal() {
    let backend = Arc::new(FakeBackend::with_meals(vec![
        meal(1, ChronoDuration::minutes(30)),
        meal(2, ChronoDuration::minutes(40)),
    ]));
    let app = logged_in(backend.clone());

    app.handle.delete(1).unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::Completed(Operation::Delete)))
        .expect("delete completed");

    assert_eq!(app.handle.state().meal_ids(), vec![2]);
    assert_eq!(backend.state.lock().deletes, vec![1]);
}

#[test]
fn test_missing_meal_is_dropped_and_list_reloaded() {
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    // The client still shows meal 5; the server already forgot it.
    let app = start(
        backend.clone(),
        logged_in_state(vec![meal(5, ChronoDuration::minutes(1))]),
        None,
    );

    app.handle.delete(5).unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::MealRemoved(5)))
        .expect("meal removed");
    wait_for_list_call(&backend);
    wait_until(&app.handle, TIMEOUT, |s| !s.meals.loading);

    assert!(app.handle.state().meal_ids().is_empty());
}

fn ids(meals: &[Meal]) -> Vec<MealId> {
    meals.iter().map(|m| m.id).collect()
}

fn wait_for_list_call(backend: &FakeBackend) {
    let deadline = std::time::Instant::now() + TIMEOUT;
    while backend.state.lock().list_calls == 0 {
        assert!(std::time::Instant::now() < deadline, "list was not reloaded");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_missing_meal_detail_reloads_list() {
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    let app = start(
        backend.clone(),
        logged_in_state(vec![meal(7, ChronoDuration::minutes(1))]),
        None,
    );

    app.handle.send_command(AppCommand::LoadMeal(7)).unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::MealRemoved(7)))
        .expect("meal removed");
    wait_for_list_call(&backend);
    wait_until(&app.handle, TIMEOUT, |s| !s.meals.loading);

    let state = app.handle.state().snapshot();
    assert!(state.meals.items.is_empty());
    assert!(state.meals.selected.is_none());
}

#[test]
fn test_successful_revert_removes_meal_everywhere() {
    let meals = vec![
        meal(1, ChronoDuration::seconds(2)),
        meal(2, ChronoDuration::minutes(30)),
    ];
    let backend = Arc::new(FakeBackend::with_meals(meals.clone()));
    backend.set_token(Some(TOKEN.into()));
    let state = logged_in_state(meals.clone());
    state.write().stats.daily = Some(DailyStats {
        meals,
        ..Default::default()
    });
    let app = start(backend.clone(), state, None);

    app.handle.revert(1).unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::Completed(Operation::Revert)))
        .expect("revert completed");

    let state = app.handle.state().snapshot();
    assert_eq!(ids(&state.meals.items), vec![2]);
    assert_eq!(ids(&state.stats.daily.unwrap().meals), vec![2]);
    assert_eq!(ids(&state.stats.dashboard.unwrap().recent_meals), vec![2]);
    assert_eq!(backend.state.lock().reverts, vec![1]);
    assert!(state.banner.is_none());
}

#[test]
fn test_results_arriving_after_logout_are_dropped() {
    let backend = Arc::new(FakeBackend::with_meals(vec![meal(1, ChronoDuration::minutes(5))]));
    backend.set_token(Some(TOKEN.into()));
    backend.state.lock().list_delay = Some(Duration::from_millis(300));
    let app = start(backend.clone(), logged_in_state(vec![]), None);

    app.handle.load_meals(MealFilter::All).unwrap();
    app.handle.logout().unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::LoggedOut))
        .expect("logged out");
    wait_for_list_call(&backend);
    std::thread::sleep(Duration::from_millis(100));

    let state = app.handle.state().snapshot();
    assert!(!app.handle.state().is_logged_in());
    assert!(state.meals.items.is_empty());
    assert!(!state.meals.loading);
}

#[test]
fn test_late_unauthorized_keeps_new_session() {
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    {
        let mut fake = backend.state.lock();
        fake.list_delay = Some(Duration::from_millis(300));
        fake.list_error = Some(MealVoiceError::Unauthorized);
    }
    let app = start(backend.clone(), logged_in_state(vec![]), None);

    app.handle.load_meals(MealFilter::All).unwrap();
    app.handle.logout().unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::LoggedOut))
        .expect("logged out");
    app.handle.login("ana@example.com", PASSWORD).unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::Completed(Operation::Login)))
        .expect("logged in again");
    wait_for_list_call(&backend);
    std::thread::sleep(Duration::from_millis(100));

    let state = app.handle.state().snapshot();
    assert_eq!(state.auth.status, AuthStatus::LoggedIn);
    assert_eq!(state.auth.token.as_deref(), Some(TOKEN));
    assert!(state.banner.is_none());
    assert_eq!(backend.state.lock().token.as_deref(), Some(TOKEN));
}

#[test]
fn test_hold_recording_uploads_exactly_once() {
    let backend = Arc::new(FakeBackend::default());
    let app = logged_in(backend.clone());
    let source = ScriptedSource::new(48_000);
    let mut capture = VoiceCapture::new(RecordingConfig::default(), source.opener());
    assert_eq!(capture.mode(), CaptureMode::Hold);

    assert!(matches!(capture.press().unwrap(), CaptureOutcome::Started));
    source.feed_level(0.2, 3.0);
    let CaptureOutcome::Finished { file, reason } = capture.release().unwrap() else {
        panic!("expected a finished recording");
    };
    assert_eq!(reason, StopReason::User);
    assert!((file.duration_secs - 3.0).abs() < 0.05);

    app.handle.upload(file).unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::Completed(Operation::Upload)))
        .expect("upload completed");

    let fake = backend.state.lock();
    assert_eq!(fake.uploads.len(), 1);
    assert!(fake.uploads[0].audio.file_name.ends_with(".wav"));
    assert!(!fake.uploads[0].timezone.is_empty());
    drop(fake);
    assert_eq!(source.released(), 1);
    let state = app.handle.state().snapshot();
    assert!(!state.recording.upload.is_uploading());
    assert!(state.recording.last_meal.is_some());
}

#[test]
fn test_denied_microphone_never_uploads() {
    let backend = Arc::new(FakeBackend::default());
    let _app = logged_in(backend.clone());
    let source = ScriptedSource::new(16_000).fail_with(MealVoiceError::MicrophonePermissionDenied);
    let mut capture = VoiceCapture::new(RecordingConfig::default(), source.opener());

    let err = capture.press().unwrap_err();
    assert_eq!(err, MealVoiceError::MicrophonePermissionDenied);
    assert!(!capture.is_recording());
    assert!(matches!(capture.release().unwrap(), CaptureOutcome::None));
    assert!(backend.state.lock().uploads.is_empty());
}

#[test]
fn test_register_then_verify() {
    let backend = Arc::new(FakeBackend::default());
    let app = start(backend, SharedAppState::new(), None);

    app.handle
        .send_command(AppCommand::Register(RegisterRequest {
            email: "new@example.com".into(),
            password1: "long enough pw".into(),
            password2: "long enough pw".into(),
            ..Default::default()
        }))
        .unwrap();
    wait_until(&app.handle, TIMEOUT, |s| {
        matches!(s.auth.status, AuthStatus::AwaitingVerification { .. })
    });

    app.handle
        .send_command(AppCommand::VerifyEmail {
            key: "good-key".into(),
        })
        .unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::Completed(Operation::VerifyEmail)))
        .expect("verified");

    let auth = app.handle.state().snapshot().auth;
    assert_eq!(auth.status, AuthStatus::LoggedOut);
    assert!(auth.notice.is_some());
}

#[test]
fn test_language_is_persisted() {
    let (_dir, store) = store();
    let backend = Arc::new(FakeBackend::default());
    let app = start(backend, SharedAppState::new(), Some(store.clone()));

    app.handle
        .send_command(AppCommand::SetLanguage(Language::Korean))
        .unwrap();
    wait_until(&app.handle, TIMEOUT, |s| s.language == Language::Korean);
    // The write happens right after the state update.
    std::thread::sleep(Duration::from_millis(50));

    assert_eq!(store.load().language, Language::Korean);
}

#[test]
fn test_logout_clears_session() {
    let (_dir, store) = store();
    store.save_auth(TOKEN, &common::user()).unwrap();
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    let app = start(backend.clone(), logged_in_state(vec![]), Some(store.clone()));

    app.handle.logout().unwrap();
    app.handle
        .wait_for(TIMEOUT, |e| matches!(e, AppEvent::LoggedOut))
        .expect("logged out");

    assert_eq!(backend.state.lock().logouts, 1);
    assert!(store.load().token.is_none());
    assert!(!app.handle.state().is_logged_in());
}
