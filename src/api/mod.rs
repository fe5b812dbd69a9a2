//! REST access to the meal service
//!
//! [`MealBackend`] is the seam the orchestrator talks to. [`HttpBackend`]
//! implements it over HTTP; tests substitute their own implementation.

pub mod auth;
pub mod client;
pub mod meals;
pub mod models;

pub use auth::AuthService;
pub use client::ApiClient;
pub use meals::MealService;
pub use models::{
    AudioFile, AuthToken, DailyStats, DashboardOverview, DaySummary, FoodItem, LoginRequest,
    Meal, MealFilter, MealId, MealType, MonthlyStats, RegisterRequest, User, VoiceUpload,
    WeeklyStats,
};

use crate::config::ApiConfig;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Everything the client asks of the backend
#[async_trait]
pub trait MealBackend: Send + Sync {
    /// Replace the credential attached to authenticated calls
    fn set_token(&self, token: Option<String>);

    async fn login(&self, request: &LoginRequest) -> Result<AuthToken>;
    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>>;
    async fn verify_email(&self, key: &str) -> Result<()>;
    async fn resend_email(&self, email: &str) -> Result<()>;
    async fn logout(&self) -> Result<()>;
    async fn profile(&self) -> Result<User>;

    async fn upload_voice(&self, upload: &VoiceUpload) -> Result<Meal>;
    async fn list_meals(&self, filter: &MealFilter) -> Result<Vec<Meal>>;
    async fn get_meal(&self, id: MealId) -> Result<Meal>;
    async fn dashboard(&self) -> Result<DashboardOverview>;
    async fn daily_stats(&self, date: NaiveDate) -> Result<DailyStats>;
    async fn weekly_stats(&self, week_start: NaiveDate) -> Result<WeeklyStats>;
    async fn monthly_stats(&self, year: i32, month: u32) -> Result<MonthlyStats>;
    async fn revert_meal(&self, id: MealId) -> Result<()>;
    async fn delete_meal(&self, id: MealId) -> Result<()>;
}

/// HTTP implementation of [`MealBackend`]
#[derive(Clone)]
pub struct HttpBackend {
    client: ApiClient,
    auth: AuthService,
    meals: MealService,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            auth: AuthService::new(client.clone()),
            meals: MealService::new(client.clone()),
            client,
        })
    }

    /// Underlying client (shares the token with both services)
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl MealBackend for HttpBackend {
    fn set_token(&self, token: Option<String>) {
        self.client.set_token(token);
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthToken> {
        self.auth.login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>> {
        self.auth.register(request).await
    }

    async fn verify_email(&self, key: &str) -> Result<()> {
        self.auth.verify_email(key).await
    }

    async fn resend_email(&self, email: &str) -> Result<()> {
        self.auth.resend_email(email).await
    }

    async fn logout(&self) -> Result<()> {
        self.auth.logout().await
    }

    async fn profile(&self) -> Result<User> {
        self.auth.profile().await
    }

    async fn upload_voice(&self, upload: &VoiceUpload) -> Result<Meal> {
        self.meals.upload_voice(upload).await
    }

    async fn list_meals(&self, filter: &MealFilter) -> Result<Vec<Meal>> {
        self.meals.list_meals(filter).await
    }

    async fn get_meal(&self, id: MealId) -> Result<Meal> {
        self.meals.get_meal(id).await
    }

    async fn dashboard(&self) -> Result<DashboardOverview> {
        self.meals.dashboard().await
    }

    async fn daily_stats(&self, date: NaiveDate) -> Result<DailyStats> {
        self.meals.daily_stats(date).await
    }

    async fn weekly_stats(&self, week_start: NaiveDate) -> Result<WeeklyStats> {
        self.meals.weekly_stats(week_start).await
    }

    async fn monthly_stats(&self, year: i32, month: u32) -> Result<MonthlyStats> {
        self.meals.monthly_stats(year, month).await
    }

    async fn revert_meal(&self, id: MealId) -> Result<()> {
        self.meals.revert_meal(id).await
    }

    async fn delete_meal(&self, id: MealId) -> Result<()> {
        self.meals.delete_meal(id).await
    }
}
