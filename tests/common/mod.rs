//! In-memory meal service shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use mealvoice::api::models::{AnalysisInfo, FoodItem};
use mealvoice::api::{
    AuthToken, DailyStats, DashboardOverview, LoginRequest, Meal, MealBackend, MealFilter, MealId,
    MealType, MonthlyStats, RegisterRequest, User, VoiceUpload, WeeklyStats,
};
use mealvoice::state::{AppState, AuthStatus, SharedAppState};
use mealvoice::{AppEvent, MealVoiceError, OrchestratorHandle, Result};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub const TOKEN: &str = "tok-valid";
pub const PASSWORD: &str = "correct horse";

/// Meal logged `age` ago, analysed at the same moment
pub fn meal(id: MealId, age: ChronoDuration) -> Meal {
    let created = Utc::now() - age;
    meal_at(id, created)
}

pub fn meal_at(id: MealId, created: DateTime<Utc>) -> Meal {
    Meal {
        id,
        consumed_at: created,
        meal_type: MealType::Lunch,
        total_calories: 540.0,
        total_protein: 25.0,
        total_carbs: 60.0,
        total_fat: 18.0,
        food_items: vec![FoodItem {
            name: "kimbap".into(),
            calories: 540.0,
            ..Default::default()
        }],
        voice_input: None,
        analysis: Some(AnalysisInfo {
            completed_at: Some(created),
            ..Default::default()
        }),
        time_reference: None,
        created_at: created,
    }
}

pub fn user() -> User {
    User {
        id: 1,
        email: "ana@example.com".into(),
        first_name: Some("Ana".into()),
        last_name: None,
    }
}

#[derive(Default)]
pub struct FakeState {
    pub token: Option<String>,
    pub meals: Vec<Meal>,
    pub next_id: MealId,
    pub dashboard_error: Option<MealVoiceError>,
    pub revert_error: Option<MealVoiceError>,
    pub delete_error: Option<MealVoiceError>,
    pub register_error: Option<MealVoiceError>,
    pub list_error: Option<MealVoiceError>,
    /// Time `list_meals` takes after accepting the request
    pub list_delay: Option<Duration>,
    pub uploads: Vec<VoiceUpload>,
    pub reverts: Vec<MealId>,
    pub deletes: Vec<MealId>,
    pub list_calls: usize,
    pub logouts: usize,
}

/// Backend holding meals in memory; the only valid credential is [`TOKEN`]
#[derive(Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_meals(meals: Vec<Meal>) -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock();
            state.next_id = meals.iter().map(|m| m.id).max().unwrap_or(0) + 1;
            state.meals = meals;
        }
        backend
    }

    fn authorize(&self) -> Result<()> {
        match self.state.lock().token.as_deref() {
            Some(TOKEN) => Ok(()),
            _ => Err(MealVoiceError::Unauthorized),
        }
    }

    fn undo(&self, id: MealId, error: Option<MealVoiceError>) -> Result<()> {
        self.authorize()?;
        if let Some(err) = error {
            return Err(err);
        }
        let mut state = self.state.lock();
        let before = state.meals.len();
        state.meals.retain(|m| m.id != id);
        if state.meals.len() == before {
            return Err(MealVoiceError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl MealBackend for FakeBackend {
    fn set_token(&self, token: Option<String>) {
        self.state.lock().token = token;
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthToken> {
        if request.email == "ana@example.com" && request.password == PASSWORD {
            Ok(AuthToken { key: TOKEN.into() })
        } else {
            Err(MealVoiceError::Rejected(
                "Unable to log in with provided credentials.".into(),
            ))
        }
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<Option<String>> {
        match self.state.lock().register_error.clone() {
            Some(err) => Err(err),
            None => Ok(Some("Verification e-mail sent.".into())),
        }
    }

    async fn verify_email(&self, key: &str) -> Result<()> {
        if key == "good-key" {
            Ok(())
        } else {
            Err(MealVoiceError::NotFound)
        }
    }

    async fn resend_email(&self, _email: &str) -> Result<()> {
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.state.lock().logouts += 1;
        Ok(())
    }

    async fn profile(&self) -> Result<User> {
        self.authorize()?;
        Ok(user())
    }

    async fn upload_voice(&self, upload: &VoiceUpload) -> Result<Meal> {
        self.authorize()?;
        let mut state = self.state.lock();
        state.uploads.push(upload.clone());
        state.next_id = state.next_id.max(1);
        let meal = meal(state.next_id, ChronoDuration::zero());
        state.next_id += 1;
        state.meals.insert(0, meal.clone());
        Ok(meal)
    }

    async fn list_meals(&self, _filter: &MealFilter) -> Result<Vec<Meal>> {
        self.authorize()?;
        let delay = self.state.lock().list_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock();
        state.list_calls += 1;
        match state.list_error.clone() {
            Some(err) => Err(err),
            None => Ok(state.meals.clone()),
        }
    }

    async fn get_meal(&self, id: MealId) -> Result<Meal> {
        self.authorize()?;
        self.state
            .lock()
            .meals
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(MealVoiceError::NotFound)
    }

    async fn dashboard(&self) -> Result<DashboardOverview> {
        self.authorize()?;
        let state = self.state.lock();
        if let Some(err) = state.dashboard_error.clone() {
            return Err(err);
        }
        Ok(DashboardOverview {
            recent_meals: state.meals.clone(),
            daily_calorie_goal: Some(2000.0),
            ..Default::default()
        })
    }

    async fn daily_stats(&self, date: NaiveDate) -> Result<DailyStats> {
        self.authorize()?;
        Ok(DailyStats {
            date: Some(date),
            ..Default::default()
        })
    }

    async fn weekly_stats(&self, week_start: NaiveDate) -> Result<WeeklyStats> {
        self.authorize()?;
        Ok(WeeklyStats {
            week_start: Some(week_start),
            ..Default::default()
        })
    }

    async fn monthly_stats(&self, year: i32, month: u32) -> Result<MonthlyStats> {
        self.authorize()?;
        Ok(MonthlyStats {
            year,
            month,
            ..Default::default()
        })
    }

    async fn revert_meal(&self, id: MealId) -> Result<()> {
        let error = self.state.lock().revert_error.clone();
        self.undo(id, error)?;
        self.state.lock().reverts.push(id);
        Ok(())
    }

    async fn delete_meal(&self, id: MealId) -> Result<()> {
        let error = self.state.lock().delete_error.clone();
        self.undo(id, error)?;
        self.state.lock().deletes.push(id);
        Ok(())
    }
}

/// State of a user who is already signed in and looking at `meals`
pub fn logged_in_state(meals: Vec<Meal>) -> SharedAppState {
    let shared = SharedAppState::new();
    {
        let mut state = shared.write();
        state.auth.status = AuthStatus::LoggedIn;
        state.auth.token = Some(TOKEN.into());
        state.auth.user = Some(user());
        state.stats.dashboard = Some(DashboardOverview {
            recent_meals: meals.clone(),
            ..Default::default()
        });
        state.meals.items = meals;
    }
    shared
}

/// Pump events until `done` holds for the state, or panic after `timeout`
pub fn wait_until(
    handle: &OrchestratorHandle,
    timeout: Duration,
    mut done: impl FnMut(&AppState) -> bool,
) -> Vec<AppEvent> {
    let deadline = Instant::now() + timeout;
    let mut events = Vec::new();
    loop {
        if done(&handle.state().read()) {
            return events;
        }
        let Some(left) = deadline.checked_duration_since(Instant::now()) else {
            panic!("condition not reached; events so far: {:?}", events);
        };
        if let Some(event) = handle.recv_event_timeout(left.min(Duration::from_millis(50))) {
            events.push(event);
        }
    }
}
