//! UI strings in the supported languages

use crate::api::MealType;
use serde::{Deserialize, Serialize};

/// Display language, persisted across restarts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Korean];

    /// Name of the language in itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Korean => "한국어",
        }
    }

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
        }
    }
}

/// Translatable UI text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    Tagline,
    Email,
    Password,
    ConfirmPassword,
    FirstName,
    LastName,
    Login,
    Logout,
    Register,
    CreateAccount,
    HaveAccount,
    VerifyEmail,
    VerificationKey,
    VerificationSent,
    ResendEmail,
    Dashboard,
    Timeline,
    Today,
    Calories,
    Protein,
    Carbs,
    Fat,
    Meals,
    RecentMeals,
    NoMeals,
    Last7Days,
    StreakDays,
    HoldToRecord,
    ClickToRecord,
    Recording,
    Uploading,
    Analyzing,
    ModeHold,
    ModeToggle,
    Revert,
    Delete,
    ConfirmRevert,
    ConfirmDelete,
    Confirm,
    Cancel,
    Day,
    Week,
    Month,
    Previous,
    Next,
    Back,
    FoodItems,
    Transcription,
    Loading,
    Dismiss,
    Language,
    // Notices and errors
    EmailVerified,
    VerificationResent,
    InvalidCredentials,
    SessionExpired,
    ItemGone,
    ServerFailed,
    Offline,
    UnexpectedResponse,
    MicrophoneDenied,
    NoMicrophone,
    AudioDeviceFailed,
    AudioProcessingFailed,
    FileSystemFailed,
    ConfigInvalid,
    InternalFailure,
}

/// Translate a UI text
pub fn tr(language: Language, text: Text) -> &'static str {
    match language {
        Language::English => english(text),
        Language::Korean => korean(text),
    }
}

/// Translated meal type label
pub fn meal_type_label(language: Language, meal_type: MealType) -> &'static str {
    match (language, meal_type) {
        (Language::English, MealType::Breakfast) => "Breakfast",
        (Language::English, MealType::Lunch) => "Lunch",
        (Language::English, MealType::Dinner) => "Dinner",
        (Language::English, MealType::Snack) => "Snack",
        (Language::English, MealType::Unknown) => "Meal",
        (Language::Korean, MealType::Breakfast) => "아침",
        (Language::Korean, MealType::Lunch) => "점심",
        (Language::Korean, MealType::Dinner) => "저녁",
        (Language::Korean, MealType::Snack) => "간식",
        (Language::Korean, MealType::Unknown) => "식사",
    }
}

fn english(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "Mealvoice",
        Text::Tagline => "Log meals by talking about them",
        Text::Email => "Email",
        Text::Password => "Password",
        Text::ConfirmPassword => "Confirm password",
        Text::FirstName => "First name",
        Text::LastName => "Last name",
        Text::Login => "Log in",
        Text::Logout => "Log out",
        Text::Register => "Register",
        Text::CreateAccount => "Create an account",
        Text::HaveAccount => "Already have an account?",
        Text::VerifyEmail => "Verify email",
        Text::VerificationKey => "Verification key",
        Text::VerificationSent => "We sent a verification email. Paste the key from it below.",
        Text::ResendEmail => "Resend email",
        Text::Dashboard => "Dashboard",
        Text::Timeline => "Timeline",
        Text::Today => "Today",
        Text::Calories => "Calories",
        Text::Protein => "Protein",
        Text::Carbs => "Carbs",
        Text::Fat => "Fat",
        Text::Meals => "Meals",
        Text::RecentMeals => "Recent meals",
        Text::NoMeals => "No meals logged yet",
        Text::Last7Days => "Last 7 days",
        Text::StreakDays => "Day streak",
        Text::HoldToRecord => "Hold to record (Space)",
        Text::ClickToRecord => "Click to record (Space)",
        Text::Recording => "Recording...",
        Text::Uploading => "Uploading...",
        Text::Analyzing => "Analyzing your meal...",
        Text::ModeHold => "Hold",
        Text::ModeToggle => "Toggle",
        Text::Revert => "Revert",
        Text::Delete => "Delete",
        Text::ConfirmRevert => "Revert this meal? The recording and analysis will be discarded.",
        Text::ConfirmDelete => "Delete this meal? This cannot be undone.",
        Text::Confirm => "Confirm",
        Text::Cancel => "Cancel",
        Text::Day => "Day",
        Text::Week => "Week",
        Text::Month => "Month",
        Text::Previous => "◀",
        Text::Next => "▶",
        Text::Back => "Back",
        Text::FoodItems => "Food items",
        Text::Transcription => "What you said",
        Text::Loading => "Loading...",
        Text::Dismiss => "Dismiss",
        Text::Language => "Language",
        Text::EmailVerified => "Email verified. You can log in now.",
        Text::VerificationResent => "Verification email sent to",
        Text::InvalidCredentials => "Invalid email or password.",
        Text::SessionExpired => "Your session has expired. Please log in again.",
        Text::ItemGone => "This item no longer exists.",
        Text::ServerFailed => "The server could not complete the request. Please try again.",
        Text::Offline => "Could not reach the server. Check your connection and try again.",
        Text::UnexpectedResponse => "Unexpected response from the server.",
        Text::MicrophoneDenied => {
            "Microphone access was denied. Allow microphone access to record meals."
        }
        Text::NoMicrophone => "No microphone found. Connect a microphone and try again.",
        Text::AudioDeviceFailed => "Audio device error. Please check your microphone.",
        Text::AudioProcessingFailed => "Audio processing failed. Please try again.",
        Text::FileSystemFailed => "File system error occurred.",
        Text::ConfigInvalid => "Configuration error. Please check settings.",
        Text::InternalFailure => "Internal communication error. Please restart the application.",
    }
}

fn korean(text: Text) -> &'static str {
    match text {
        Text::AppTitle => "Mealvoice",
        Text::Tagline => "말로 식사를 기록하세요",
        Text::Email => "이메일",
        Text::Password => "비밀번호",
        Text::ConfirmPassword => "비밀번호 확인",
        Text::FirstName => "이름",
        Text::LastName => "성",
        Text::Login => "로그인",
        Text::Logout => "로그아웃",
        Text::Register => "가입하기",
        Text::CreateAccount => "계정 만들기",
        Text::HaveAccount => "이미 계정이 있으신가요?",
        Text::VerifyEmail => "이메일 인증",
        Text::VerificationKey => "인증 키",
        Text::VerificationSent => "인증 메일을 보냈습니다. 메일의 키를 아래에 붙여 넣으세요.",
        Text::ResendEmail => "메일 다시 보내기",
        Text::Dashboard => "대시보드",
        Text::Timeline => "타임라인",
        Text::Today => "오늘",
        Text::Calories => "칼로리",
        Text::Protein => "단백질",
        Text::Carbs => "탄수화물",
        Text::Fat => "지방",
        Text::Meals => "식사",
        Text::RecentMeals => "최근 식사",
        Text::NoMeals => "아직 기록된 식사가 없습니다",
        Text::Last7Days => "최근 7일",
        Text::StreakDays => "연속 기록일",
        Text::HoldToRecord => "누르고 있는 동안 녹음 (Space)",
        Text::ClickToRecord => "클릭하여 녹음 (Space)",
        Text::Recording => "녹음 중...",
        Text::Uploading => "업로드 중...",
        Text::Analyzing => "식사를 분석하는 중...",
        Text::ModeHold => "누르기",
        Text::ModeToggle => "토글",
        Text::Revert => "되돌리기",
        Text::Delete => "삭제",
        Text::ConfirmRevert => "이 식사를 되돌릴까요? 녹음과 분석 결과가 삭제됩니다.",
        Text::ConfirmDelete => "이 식사를 삭제할까요? 되돌릴 수 없습니다.",
        Text::Confirm => "확인",
        Text::Cancel => "취소",
        Text::Day => "일",
        Text::Week => "주",
        Text::Month => "월",
        Text::Previous => "◀",
        Text::Next => "▶",
        Text::Back => "뒤로",
        Text::FoodItems => "음식 항목",
        Text::Transcription => "말한 내용",
        Text::Loading => "불러오는 중...",
        Text::Dismiss => "닫기",
        Text::Language => "언어",
        Text::EmailVerified => "이메일이 인증되었습니다. 이제 로그인할 수 있습니다.",
        Text::VerificationResent => "인증 메일을 다시 보냈습니다:",
        Text::InvalidCredentials => "이메일 또는 비밀번호가 올바르지 않습니다.",
        Text::SessionExpired => "세션이 만료되었습니다. 다시 로그인해 주세요.",
        Text::ItemGone => "이 항목은 더 이상 존재하지 않습니다.",
        Text::ServerFailed => "서버가 요청을 처리하지 못했습니다. 다시 시도해 주세요.",
        Text::Offline => "서버에 연결할 수 없습니다. 네트워크를 확인하고 다시 시도해 주세요.",
        Text::UnexpectedResponse => "서버 응답을 이해할 수 없습니다.",
        Text::MicrophoneDenied => "마이크 권한이 거부되었습니다. 식사를 녹음하려면 마이크 접근을 허용해 주세요.",
        Text::NoMicrophone => "마이크를 찾을 수 없습니다. 마이크를 연결하고 다시 시도해 주세요.",
        Text::AudioDeviceFailed => "오디오 장치 오류입니다. 마이크를 확인해 주세요.",
        Text::AudioProcessingFailed => "오디오 처리에 실패했습니다. 다시 시도해 주세요.",
        Text::FileSystemFailed => "파일 시스템 오류가 발생했습니다.",
        Text::ConfigInvalid => "설정 오류입니다. 설정을 확인해 주세요.",
        Text::InternalFailure => "내부 통신 오류입니다. 앱을 다시 시작해 주세요.",
    }
}
