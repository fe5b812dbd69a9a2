//! Wire types mirrored from the meal service
//!
//! Every response type is lenient: missing numeric fields default to zero and
//! unknown enum values fall back to `Unknown`, since the client only renders
//! what the server computed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Server-side meal identifier
pub type MealId = i64;

/// Authenticated user
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "pk")]
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    /// Full name if present, otherwise the email
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Categorical meal label
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MealType {
    /// All variants in display order
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Unknown,
    ];

    /// Stable key used for translations
    pub fn key(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Line item within a meal
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodItem {
    pub id: Option<i64>,
    /// Name as spoken
    pub name: String,
    /// English translation, when the spoken language differs
    #[serde(alias = "name_english")]
    pub name_en: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl FoodItem {
    /// "1.5 cup", "2", or empty
    pub fn portion(&self) -> String {
        match (self.quantity, self.unit.as_deref()) {
            (Some(q), Some(u)) if !u.is_empty() => format!("{} {}", trim_float(q), u),
            (Some(q), _) => trim_float(q),
            (None, Some(u)) => u.to_string(),
            (None, None) => String::new(),
        }
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Reference to the voice recording a meal was created from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceInputRef {
    pub id: Option<i64>,
    pub transcription: Option<String>,
    pub audio_url: Option<String>,
    pub language: Option<String>,
}

/// AI analysis metadata attached to a meal
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInfo {
    pub completed_at: Option<DateTime<Utc>>,
    pub confidence: Option<f64>,
    pub model: Option<String>,
}

/// One logged eating event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: MealId,
    pub consumed_at: DateTime<Utc>,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
    #[serde(default)]
    pub voice_input: Option<VoiceInputRef>,
    #[serde(default)]
    pub analysis: Option<AnalysisInfo>,
    /// Raw time phrase the backend resolved ("last night")
    #[serde(default)]
    pub time_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Meal {
    /// Timestamp the revert window counts from
    pub fn revert_reference(&self) -> DateTime<Utc> {
        self.analysis
            .as_ref()
            .and_then(|a| a.completed_at)
            .unwrap_or(self.created_at)
    }

    /// Timestamp the delete window counts from
    pub fn delete_reference(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Transcription text, if the backend sent it
    pub fn transcription(&self) -> Option<&str> {
        self.voice_input
            .as_ref()
            .and_then(|v| v.transcription.as_deref())
    }
}

/// Per-day rollup used by dashboard, weekly and monthly stats
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySummary {
    pub date: Option<NaiveDate>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meal_count: u32,
}

/// Stats for a single day, including the meals themselves
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    pub date: Option<NaiveDate>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub meal_count: u32,
    pub meals: Vec<Meal>,
}

/// Stats for a 7-day week
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyStats {
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
    pub total_calories: f64,
    pub average_calories: f64,
    pub days: Vec<DaySummary>,
}

/// Stats for a calendar month
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub total_calories: f64,
    pub average_calories: f64,
    pub days: Vec<DaySummary>,
}

/// Landing page aggregate
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOverview {
    pub today: DaySummary,
    pub last_7_days: Vec<DaySummary>,
    pub recent_meals: Vec<Meal>,
    pub streak_days: u32,
    pub daily_calorie_goal: Option<f64>,
}

/// Token returned by the login endpoint
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthToken {
    #[serde(alias = "token", alias = "access")]
    pub key: String,
}

/// Login payload
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password1: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}

/// Generic `{detail}` acknowledgement
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DetailResponse {
    pub detail: Option<String>,
}

/// Meal list scope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MealFilter {
    All,
    Date(NaiveDate),
    /// Week starting on the given day
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl MealFilter {
    /// Query parameters for `GET /food/meals/`
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            MealFilter::All => Vec::new(),
            MealFilter::Date(date) => vec![("date", date.format("%Y-%m-%d").to_string())],
            MealFilter::Week(start) => {
                vec![("week_start", start.format("%Y-%m-%d").to_string())]
            }
            MealFilter::Month { year, month } => {
                vec![("month", format!("{:04}-{:02}", year, month))]
            }
        }
    }

    /// Whether a meal eaten on `date` belongs in this scope
    pub fn covers(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        match self {
            MealFilter::All => true,
            MealFilter::Date(day) => *day == date,
            MealFilter::Week(start) => {
                date >= *start && date < *start + chrono::Duration::days(7)
            }
            MealFilter::Month { year, month } => date.year() == *year && date.month() == *month,
        }
    }
}

/// Audio file ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct AudioFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Duration of the encoded audio
    pub duration_secs: f32,
}

/// Voice upload with the client's local time context
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceUpload {
    pub audio: AudioFile,
    /// Local wall-clock time, RFC 3339 with offset
    pub client_timestamp: String,
    /// Local UTC offset, `+HH:MM`
    pub timezone: String,
}

impl VoiceUpload {
    /// Attach the current local time context to a recording
    pub fn now(audio: AudioFile) -> Self {
        let local = chrono::Local::now();
        Self {
            audio,
            client_timestamp: local.to_rfc3339(),
            timezone: local.offset().to_string(),
        }
    }
}

/// Upload responses come either as the meal or wrapped with extra metadata
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadResponse {
    Wrapped { meal: Meal },
    Bare(Meal),
}

impl UploadResponse {
    pub(crate) fn into_meal(self) -> Meal {
        match self {
            UploadResponse::Wrapped { meal } => meal,
            UploadResponse::Bare(meal) => meal,
        }
    }
}

/// List endpoints may or may not paginate
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MealList {
    Page { results: Vec<Meal> },
    Plain(Vec<Meal>),
}

impl MealList {
    pub(crate) fn into_vec(self) -> Vec<Meal> {
        match self {
            MealList::Page { results } => results,
            MealList::Plain(meals) => meals,
        }
    }
}
