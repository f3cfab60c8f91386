//! Backend HTTP client
//!
//! Pure HTTP client for the self-hosted sync backend: the meta endpoint and
//! the challenge-response auth ceremony. Key derivation and signing live in
//! `pstream-core`; this client only moves the resulting strings.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use crate::error::{check_auth_response, check_response, json_with_limit, BackendError};
use crate::types::{
    BackendMeta, ChallengeTokenResponse, LoginRequest, LoginResponse, RegisterRequest,
    UserResponse,
};

/// Shared HTTP client for all backend requests (connection pooling).
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build backend shared HTTP client")
});

pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a client for the backend at `base_url` (no trailing slash
    /// required).
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&trimmed)
            .map_err(|e| BackendError::InvalidConfig(format!("Invalid backend url: {e}")))?;
        Ok(Self {
            base_url: trimmed,
            client: SHARED_CLIENT.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /meta` — backend self-description, with `\'` unescaping applied
    /// to the free-text fields.
    pub async fn meta(&self) -> Result<BackendMeta, BackendError> {
        let response = self.client.get(self.endpoint("/meta")).send().await?;
        let response = check_response(response)?;
        let meta: BackendMeta = json_with_limit(response).await?;
        Ok(meta.unescaped())
    }

    /// Request a registration challenge. The captcha token is only needed
    /// when [`BackendMeta::has_captcha`] is set.
    pub async fn get_register_challenge(
        &self,
        captcha_token: Option<&str>,
    ) -> Result<String, BackendError> {
        let mut body = json!({});
        if let Some(token) = captcha_token {
            body["captchaToken"] = json!(token);
        }

        let response = self
            .client
            .post(self.endpoint("/auth/register/start"))
            .json(&body)
            .send()
            .await?;
        let response = check_response(response)?;
        let challenge: ChallengeTokenResponse = json_with_limit(response).await?;
        Ok(challenge.challenge)
    }

    /// Complete registration with the signed challenge.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, BackendError> {
        let response = self
            .client
            .post(self.endpoint("/auth/register/complete"))
            .json(request)
            .send()
            .await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Request a login challenge for a public key.
    pub async fn get_login_challenge(&self, public_key: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.endpoint("/auth/login/start"))
            .json(&json!({ "publicKey": public_key }))
            .send()
            .await?;
        let response = check_response(response)?;
        let challenge: ChallengeTokenResponse = json_with_limit(response).await?;
        Ok(challenge.challenge)
    }

    /// Complete login with the signed challenge.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let response = self
            .client
            .post(self.endpoint("/auth/login/complete"))
            .json(request)
            .send()
            .await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// `GET /users/@me` — validate a session token and fetch the account it
    /// belongs to. Credential rejections surface as
    /// [`BackendError::ForceLogout`].
    pub async fn current_user(&self, token: &str) -> Result<UserResponse, BackendError> {
        let response = self
            .client
            .get(self.endpoint("/users/@me"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_auth_response(response)?;
        json_with_limit(response).await
    }

    /// `DELETE /sessions/{id}` — log out a session.
    pub async fn delete_session(&self, token: &str, session_id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/sessions/{session_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        check_auth_response(response)?;
        Ok(())
    }
}
