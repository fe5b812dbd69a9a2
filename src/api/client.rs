//! HTTP client for the meal service
//!
//! Wraps `reqwest` with token injection and turns every non-success response
//! into a [`MealVoiceError`] so callers only ever see the flat taxonomy.

use crate::config::ApiConfig;
use crate::error::{FieldErrors, MealVoiceError, Result};
use parking_lot::RwLock;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keys that carry a single human-readable message in DRF-style bodies
const MESSAGE_KEYS: [&str; 4] = ["detail", "error", "message", "non_field_errors"];

/// Low-level API client shared by the auth and meal services
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| MealVoiceError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Replace the cached auth token
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// Current auth token
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Backend configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URL for an API path such as `/food/meals/`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Start a request with the auth header attached when a token is cached
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("{} {}", self.config.auth_scheme, token),
            ),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("[API] Failed to decode response: {}", e);
            MealVoiceError::Decode(e.to_string())
        })
    }

    /// Send a request and decode a JSON body, tolerating an empty one
    pub async fn send_json_or_default<T: DeserializeOwned + Default>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request and discard the body
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(|_| ())
    }

    /// Send a request, mapping non-success statuses to errors
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("[API] {} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }

    /// `GET path?query` decoded as JSON
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.send_json(self.request(Method::GET, path).query(query))
            .await
    }

    /// `POST path` with a JSON body, decoded as JSON
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }
}

/// Map a failed response to the client error taxonomy
pub fn error_from_response(status: StatusCode, body: &str) -> MealVoiceError {
    match status {
        StatusCode::UNAUTHORIZED => MealVoiceError::Unauthorized,
        StatusCode::NOT_FOUND => MealVoiceError::NotFound,
        StatusCode::BAD_REQUEST => bad_request_error(body),
        _ => MealVoiceError::Server {
            status: status.as_u16(),
            message: message_from_body(body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
        },
    }
}

/// 400 bodies either name fields (validation) or carry one message (rule)
fn bad_request_error(body: &str) -> MealVoiceError {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        let text = body.trim();
        return MealVoiceError::Rejected(if text.is_empty() {
            "Bad request".to_string()
        } else {
            text.to_string()
        });
    };

    let mut fields = FieldErrors::new();
    for (key, value) in &map {
        if MESSAGE_KEYS.contains(&key.as_str()) {
            continue;
        }
        let messages = messages_from_value(value);
        if !messages.is_empty() {
            fields.insert(key.clone(), messages);
        }
    }

    let message = MESSAGE_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(|v| messages_from_value(v).into_iter().next()));

    if fields.is_empty() {
        MealVoiceError::Rejected(message.unwrap_or_else(|| "Bad request".to_string()))
    } else {
        MealVoiceError::Validation {
            message: message.unwrap_or_else(|| "Please correct the highlighted fields.".to_string()),
            fields,
        }
    }
}

fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    MESSAGE_KEYS
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| messages_from_value(v).into_iter().next()))
}

fn messages_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(messages_from_value).collect(),
        Value::Object(map) => map.values().flat_map(messages_from_value).collect(),
        _ => Vec::new(),
    }
}
