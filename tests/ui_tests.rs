//! UI automation tests using egui_kittest and AccessKit
//!
//! The full app runs against an in-memory backend; tests drive it through
//! accessibility labels and wait for the orchestrator between frames.

mod common;

use chrono::Duration as ChronoDuration;
use common::{logged_in_state, meal, FakeBackend, TOKEN};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use mealvoice::api::MealBackend;
use mealvoice::audio::{CaptureMode, ScriptedSource, VoiceCapture};
use mealvoice::config::RecordingConfig;
use mealvoice::error::FieldErrors;
use mealvoice::i18n::{tr, Language, Text};
use mealvoice::ui::MealVoiceApp;
use mealvoice::{MealVoiceError, Orchestrator, OrchestratorConfig, SharedAppState};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(5);

fn app_with(backend: Arc<FakeBackend>, state: SharedAppState, capture: VoiceCapture) -> MealVoiceApp {
    let (orchestrator, handle) =
        Orchestrator::with_state(OrchestratorConfig::default(), backend, state);
    // Detached: the loop ends once the app drops its handle.
    orchestrator.start().unwrap();
    MealVoiceApp::from_parts(handle, capture)
}

fn silent_capture(mode: CaptureMode) -> (VoiceCapture, ScriptedSource) {
    let source = ScriptedSource::new(16_000);
    let config = RecordingConfig {
        default_mode: mode,
        ..RecordingConfig::default()
    };
    (VoiceCapture::new(config, source.opener()), source)
}

fn harness(app: MealVoiceApp) -> Harness<'static, MealVoiceApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(600.0, 1400.0))
        .build_state(|ctx, app: &mut MealVoiceApp| app.ui(ctx), app)
}

/// Run frames until `done` holds or the timeout passes
fn run_until(
    harness: &mut Harness<'static, MealVoiceApp>,
    what: &str,
    mut done: impl FnMut(&Harness<'static, MealVoiceApp>) -> bool,
) {
    let deadline = Instant::now() + TIMEOUT;
    loop {
        harness.run();
        if done(harness) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn logged_in_app(backend: &Arc<FakeBackend>) -> MealVoiceApp {
    backend.set_token(Some(TOKEN.into()));
    let meals = backend.state.lock().meals.clone();
    let (capture, _) = silent_capture(CaptureMode::Hold);
    app_with(backend.clone(), logged_in_state(meals), capture)
}

#[test]
fn test_revert_shown_only_inside_window() {
    let backend = Arc::new(FakeBackend::with_meals(vec![
        meal(1, ChronoDuration::seconds(3)),
        meal(2, ChronoDuration::seconds(60)),
        meal(3, ChronoDuration::hours(4)),
    ]));
    let mut harness = harness(logged_in_app(&backend));
    harness.run();

    let _ = harness.get_by_label("Revert meal 1");
    let _ = harness.get_by_label("Delete meal 1");

    assert!(harness.query_by_label("Revert meal 2").is_none());
    let _ = harness.get_by_label("Delete meal 2");

    let _ = harness.get_by_label("Meal 3");
    assert!(harness.query_by_label("Revert meal 3").is_none());
    assert!(harness.query_by_label("Delete meal 3").is_none());
}

#[test]
fn test_rejected_revert_hides_button_but_keeps_meal() {
    let backend = Arc::new(FakeBackend::with_meals(vec![meal(1, ChronoDuration::seconds(2))]));
    backend.state.lock().revert_error =
        Some(MealVoiceError::Rejected("Revert window has expired".into()));
    let mut harness = harness(logged_in_app(&backend));
    harness.run();

    harness.get_by_label("Revert meal 1").click();
    harness.run();
    harness.get_by_label("Confirm").click();

    run_until(&mut harness, "revert button to disappear", |h| {
        h.query_by_label("Revert meal 1").is_none()
    });

    let _ = harness.get_by_label("Meal 1");
    let _ = harness.get_by_label("Delete meal 1");
    let _ = harness.get_by_label("Revert window has expired");
    assert_eq!(harness.state().handle().state().meal_ids(), vec![1]);
}

#[test]
fn test_confirmed_revert_removes_card() {
    let backend = Arc::new(FakeBackend::with_meals(vec![
        meal(1, ChronoDuration::seconds(2)),
        meal(2, ChronoDuration::minutes(20)),
    ]));
    let mut harness = harness(logged_in_app(&backend));
    harness.run();

    harness.get_by_label("Revert meal 1").click();
    harness.run();
    harness.get_by_label("Confirm").click();

    run_until(&mut harness, "meal 1 to disappear", |h| {
        h.query_by_label("Meal 1").is_none()
    });

    assert!(harness.query_by_label("Revert meal 1").is_none());
    let _ = harness.get_by_label("Meal 2");
    assert_eq!(backend.state.lock().reverts, vec![1]);
}

#[test]
fn test_cancelled_confirmation_sends_nothing() {
    let backend = Arc::new(FakeBackend::with_meals(vec![meal(1, ChronoDuration::minutes(10))]));
    let mut harness = harness(logged_in_app(&backend));
    harness.run();

    harness.get_by_label("Delete meal 1").click();
    harness.run();
    harness.get_by_label("Cancel").click();
    harness.run();

    assert!(harness.query_by_label("Confirm").is_none());
    std::thread::sleep(Duration::from_millis(100));
    assert!(backend.state.lock().deletes.is_empty());
}

#[test]
fn test_confirmed_delete_removes_card() {
    let backend = Arc::new(FakeBackend::with_meals(vec![
        meal(1, ChronoDuration::minutes(10)),
        meal(2, ChronoDuration::minutes(20)),
    ]));
    let mut harness = harness(logged_in_app(&backend));
    harness.run();

    harness.get_by_label("Delete meal 2").click();
    harness.run();
    harness.get_by_label("Confirm").click();

    run_until(&mut harness, "meal 2 to disappear", |h| {
        h.query_by_label("Meal 2").is_none()
    });

    let _ = harness.get_by_label("Meal 1");
    assert_eq!(backend.state.lock().deletes, vec![2]);
}

#[test]
fn test_login_error_is_shown() {
    let backend = Arc::new(FakeBackend::default());
    let (capture, _) = silent_capture(CaptureMode::Hold);
    let mut harness = harness(app_with(backend, SharedAppState::new(), capture));
    harness.run();

    harness.get_by_label("Email input").focus();
    harness.run();
    harness.get_by_label("Email input").type_text("ana@example.com");
    harness.run();
    harness.get_by_label("Password input").focus();
    harness.run();
    harness.get_by_label("Password input").type_text("wrong");
    harness.run();
    harness.get_by_label("Log in").click();

    run_until(&mut harness, "the form error", |h| {
        h.query_by_label("Form error: Unable to log in with provided credentials.")
            .is_some()
    });
}

#[test]
fn test_registration_field_errors_render_inline() {
    let backend = Arc::new(FakeBackend::default());
    let mut fields = FieldErrors::new();
    fields.insert("password1".into(), vec!["This password is too short.".into()]);
    backend.state.lock().register_error = Some(MealVoiceError::Validation {
        message: "Please correct the highlighted fields.".into(),
        fields,
    });
    let (capture, _) = silent_capture(CaptureMode::Hold);
    let mut harness = harness(app_with(backend, SharedAppState::new(), capture));
    harness.run();

    harness.get_by_label("Create an account").click();
    harness.run();

    for (label, text) in [
        ("Email input", "new@example.com"),
        ("Password input", "short"),
        ("Confirm password input", "short"),
    ] {
        harness.get_by_label(label).focus();
        harness.run();
        harness.get_by_label(label).type_text(text);
        harness.run();
    }
    harness.get_by_label("Register").click();

    run_until(&mut harness, "the password field error", |h| {
        h.query_by_label("Password input error: This password is too short.")
            .is_some()
    });
}

#[test]
fn test_toggle_recording_uploads_once() {
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    let (capture, source) = silent_capture(CaptureMode::Toggle);
    let mut harness = harness(app_with(backend.clone(), logged_in_state(vec![]), capture));
    harness.run();

    harness.get_by_label("Record meal").click();
    harness.run();
    assert!(source.is_started());

    source.feed_level(0.2, 1.0);
    harness.run();
    harness.get_by_label("Stop recording").click();

    run_until(&mut harness, "the upload", |_| {
        backend.state.lock().uploads.len() == 1
    });
    run_until(&mut harness, "the new meal card", |h| {
        h.query_by_label("Meal 1").is_some()
    });
    assert_eq!(source.released(), 1);
    assert_eq!(backend.state.lock().uploads.len(), 1);
}

#[test]
fn test_denied_microphone_shows_message() {
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    let source =
        ScriptedSource::new(16_000).fail_with(MealVoiceError::MicrophonePermissionDenied);
    let config = RecordingConfig {
        default_mode: CaptureMode::Toggle,
        ..RecordingConfig::default()
    };
    let capture = VoiceCapture::new(config, source.opener());
    let mut harness = harness(app_with(backend.clone(), logged_in_state(vec![]), capture));
    harness.run();

    harness.get_by_label("Record meal").click();
    harness.run();

    let _ = harness.get_by_label(&MealVoiceError::MicrophonePermissionDenied.user_message());
    assert!(!harness.state().capture().is_recording());
    assert!(backend.state.lock().uploads.is_empty());
}

#[test]
fn test_capture_error_follows_language() {
    let backend = Arc::new(FakeBackend::default());
    backend.set_token(Some(TOKEN.into()));
    let source = ScriptedSource::new(16_000).fail_with(MealVoiceError::NoMicrophone);
    let config = RecordingConfig {
        default_mode: CaptureMode::Toggle,
        ..RecordingConfig::default()
    };
    let state = logged_in_state(vec![]);
    state.write().language = Language::Korean;
    let capture = VoiceCapture::new(config, source.opener());
    let mut harness = harness(app_with(backend, state, capture));
    harness.run();

    harness.get_by_label("Record meal").click();
    harness.run();

    let _ = harness.get_by_label(tr(Language::Korean, Text::NoMicrophone));
    assert!(harness
        .query_by_label(&MealVoiceError::NoMicrophone.user_message())
        .is_none());
}
