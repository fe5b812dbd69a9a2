//! Meal, upload and statistics endpoints

use crate::api::client::ApiClient;
use crate::api::models::{
    DailyStats, DashboardOverview, Meal, MealFilter, MealId, MealList, MonthlyStats,
    UploadResponse, VoiceUpload, WeeklyStats,
};
use crate::error::{MealVoiceError, Result};
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

/// Typed wrapper around the `/food/` endpoints
#[derive(Clone)]
pub struct MealService {
    client: ApiClient,
}

impl MealService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Upload a recording for transcription and analysis
    pub async fn upload_voice(&self, upload: &VoiceUpload) -> Result<Meal> {
        info!(
            "[API] Uploading {} ({} bytes, {:.1}s)",
            upload.audio.file_name,
            upload.audio.bytes.len(),
            upload.audio.duration_secs
        );

        let part = Part::bytes(upload.audio.bytes.clone())
            .file_name(upload.audio.file_name.clone())
            .mime_str(&upload.audio.mime_type)
            .map_err(|e| MealVoiceError::AudioProcessingError(format!("Invalid MIME type: {}", e)))?;

        let form = Form::new()
            .part("audio_file", part)
            .text("client_timestamp", upload.client_timestamp.clone())
            .text("timezone", upload.timezone.clone());

        let builder = self
            .client
            .request(Method::POST, "/food/voice-inputs/upload/")
            .timeout(self.client.config().upload_timeout())
            .multipart(form);

        let response: UploadResponse = self.client.send_json(builder).await?;
        Ok(response.into_meal())
    }

    /// List meals within a scope
    pub async fn list_meals(&self, filter: &MealFilter) -> Result<Vec<Meal>> {
        let list: MealList = self.client.get("/food/meals/", &filter.query()).await?;
        Ok(list.into_vec())
    }

    /// Fetch a single meal
    pub async fn get_meal(&self, id: MealId) -> Result<Meal> {
        self.client.get(&format!("/food/meals/{}/", id), &[]).await
    }

    pub async fn dashboard(&self) -> Result<DashboardOverview> {
        self.client.get("/food/meals/dashboard/", &[]).await
    }

    pub async fn daily_stats(&self, date: NaiveDate) -> Result<DailyStats> {
        self.client
            .get(
                "/food/meals/stats/daily/",
                &[("date", date.format("%Y-%m-%d").to_string())],
            )
            .await
    }

    pub async fn weekly_stats(&self, week_start: NaiveDate) -> Result<WeeklyStats> {
        self.client
            .get(
                "/food/meals/stats/weekly/",
                &[("week_start", week_start.format("%Y-%m-%d").to_string())],
            )
            .await
    }

    pub async fn monthly_stats(&self, year: i32, month: u32) -> Result<MonthlyStats> {
        self.client
            .get(
                "/food/meals/stats/monthly/",
                &[("year", year.to_string()), ("month", month.to_string())],
            )
            .await
    }

    /// Undo a meal log; only accepted within 20s of analysis completion
    pub async fn revert_meal(&self, id: MealId) -> Result<()> {
        info!("[API] Reverting meal {}", id);
        let builder = self
            .client
            .request(Method::POST, &format!("/food/meals/{}/revert/", id));
        self.client.send_empty(builder).await
    }

    /// Remove a meal log; only accepted within 3h of creation
    pub async fn delete_meal(&self, id: MealId) -> Result<()> {
        info!("[API] Deleting meal {}", id);
        let builder = self
            .client
            .request(Method::DELETE, &format!("/food/meals/{}/delete/", id));
        self.client.send_empty(builder).await
    }
}
