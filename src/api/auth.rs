//! Authentication endpoints

use crate::api::client::ApiClient;
use crate::api::models::{AuthToken, DetailResponse, LoginRequest, RegisterRequest, User};
use crate::error::Result;
use reqwest::Method;
use serde_json::json;
use tracing::info;

/// Typed wrapper around the `/auth/` endpoints
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token
    ///
    /// The token is not cached here; the caller decides when it becomes the
    /// active credential (after the profile loads).
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthToken> {
        info!("[AUTH] Logging in as {}", request.email);
        self.client.post("/auth/login/", request).await
    }

    /// Create an account; the backend then emails a verification key
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>> {
        info!("[AUTH] Registering {}", request.email);
        let builder = self
            .client
            .request(Method::POST, "/auth/registration/")
            .json(request);
        let response: DetailResponse = self.client.send_json_or_default(builder).await?;
        Ok(response.detail)
    }

    /// Confirm the key from the verification email
    pub async fn verify_email(&self, key: &str) -> Result<()> {
        let builder = self
            .client
            .request(Method::POST, "/auth/registration/verify-email/")
            .json(&json!({ "key": key }));
        self.client.send_empty(builder).await
    }

    /// Ask the backend to send the verification email again
    pub async fn resend_email(&self, email: &str) -> Result<()> {
        let builder = self
            .client
            .request(Method::POST, "/auth/registration/resend-email/")
            .json(&json!({ "email": email }));
        self.client.send_empty(builder).await
    }

    /// Invalidate the token server-side
    pub async fn logout(&self) -> Result<()> {
        let builder = self.client.request(Method::POST, "/auth/logout/");
        self.client.send_empty(builder).await
    }

    /// Load the current user; doubles as token validation
    pub async fn profile(&self) -> Result<User> {
        self.client.get("/auth/profile/", &[]).await
    }
}
