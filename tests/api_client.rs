//! HTTP backend tests against a mock meal service

use chrono::NaiveDate;
use mealvoice::api::{
    AudioFile, HttpBackend, LoginRequest, MealBackend, MealFilter, RegisterRequest, VoiceUpload,
};
use mealvoice::config::ApiConfig;
use mealvoice::MealVoiceError;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    let config = ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    };
    HttpBackend::new(config).unwrap()
}

fn meal_json(id: i64) -> Value {
    json!({
        "id": id,
        "consumed_at": "2026-10-18T12:10:00Z",
        "meal_type": "lunch",
        "total_calories": 650,
        "total_protein": 30,
        "total_carbs": 80,
        "total_fat": 20,
        "food_items": [{"name": "bibimbap", "calories": 650}],
        "analysis": {"completed_at": "2026-10-18T12:10:30Z"},
        "created_at": "2026-10-18T12:10:25Z"
    })
}

#[tokio::test]
async fn test_login_returns_token_without_caching_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_string_contains("ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "tok-1"})))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let token = backend
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();

    assert_eq!(token.key, "tok-1");
    assert_eq!(backend.client().token(), None);
}

#[tokio::test]
async fn test_authenticated_calls_send_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .and(header("Authorization", "Token tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pk": 3, "email": "ana@example.com", "first_name": "Ana"
        })))
        .mount(&server)
        .await;

    let backend = backend(&server);
    backend.set_token(Some("tok-1".into()));
    let user = backend.profile().await.unwrap();

    assert_eq!(user.id, 3);
    assert_eq!(user.display_name(), "Ana");
}

#[tokio::test]
async fn test_401_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/meals/dashboard/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})),
        )
        .mount(&server)
        .await;

    let err = backend(&server).dashboard().await.unwrap_err();
    assert_eq!(err, MealVoiceError::Unauthorized);
}

#[tokio::test]
async fn test_registration_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/registration/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["A user is already registered with this e-mail address."],
            "password1": ["This password is too short."]
        })))
        .mount(&server)
        .await;

    let err = backend(&server)
        .register(&RegisterRequest {
            email: "ana@example.com".into(),
            password1: "x".into(),
            password2: "x".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    let fields = err.field_errors().expect("field errors");
    assert_eq!(
        fields["email"],
        vec!["A user is already registered with this e-mail address.".to_string()]
    );
    assert!(fields.contains_key("password1"));
}

#[tokio::test]
async fn test_revert_rejection_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/food/meals/7/revert/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Revert window has expired"
        })))
        .mount(&server)
        .await;

    let err = backend(&server).revert_meal(7).await.unwrap_err();
    assert_eq!(
        err,
        MealVoiceError::Rejected("Revert window has expired".into())
    );
    assert_eq!(err.user_message(), "Revert window has expired");
}

#[tokio::test]
async fn test_delete_of_missing_meal_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/food/meals/8/delete/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = backend(&server).delete_meal(8).await.unwrap_err();
    assert_eq!(err, MealVoiceError::NotFound);
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/food/meals/8/delete/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server).delete_meal(8).await.unwrap();
}

#[tokio::test]
async fn test_upload_sends_multipart_with_time_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/food/voice-inputs/upload/"))
        .and(body_string_contains("name=\"audio_file\"; filename=\"meal.wav\""))
        .and(body_string_contains("name=\"client_timestamp\""))
        .and(body_string_contains("name=\"timezone\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "meal": meal_json(11),
            "voice_input": {"id": 4}
        })))
        .mount(&server)
        .await;

    let upload = VoiceUpload::now(AudioFile {
        file_name: "meal.wav".into(),
        mime_type: "audio/wav".into(),
        bytes: vec![0u8; 64],
        duration_secs: 1.0,
    });
    let meal = backend(&server).upload_voice(&upload).await.unwrap();

    assert_eq!(meal.id, 11);
    assert_eq!(meal.food_items[0].name, "bibimbap");
}

#[tokio::test]
async fn test_list_meals_accepts_paginated_and_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/meals/"))
        .and(query_param("date", "2026-10-18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2, "next": null, "results": [meal_json(1), meal_json(2)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/food/meals/"))
        .and(query_param("month", "2026-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([meal_json(3)])))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let daily = backend.list_meals(&MealFilter::Date(day)).await.unwrap();
    let monthly = backend
        .list_meals(&MealFilter::Month {
            year: 2026,
            month: 10,
        })
        .await
        .unwrap();

    assert_eq!(daily.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(monthly.len(), 1);
}

#[tokio::test]
async fn test_weekly_stats_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/meals/stats/weekly/"))
        .and(query_param("week_start", "2026-10-12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "week_start": "2026-10-12",
            "total_calories": 12000,
            "average_calories": 1714.3,
            "days": [{"date": "2026-10-12", "total_calories": 1800, "meal_count": 3}]
        })))
        .mount(&server)
        .await;

    let start = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
    let weekly = backend(&server).weekly_stats(start).await.unwrap();

    assert_eq!(weekly.days.len(), 1);
    assert_eq!(weekly.days[0].meal_count, 3);
    assert_eq!(weekly.total_calories, 12000.0);
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/meals/5/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    match backend(&server).get_meal(5).await {
        Err(MealVoiceError::Server { status, .. }) => assert_eq!(status, 503),
        other => panic!("unexpected result: {:?}", other),
    }
}
