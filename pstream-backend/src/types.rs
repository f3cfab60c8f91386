//! Wire types for the self-hosted backend API.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

/// `GET /meta` response: backend self-description for the server-selection
/// screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMeta {
    pub version: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub has_captcha: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_client_key: Option<String>,
}

impl BackendMeta {
    /// Some backends double-escape apostrophes in their free-text fields;
    /// undo the literal `\'` sequences before display.
    #[must_use]
    pub fn unescaped(mut self) -> Self {
        self.name = unescape_quotes(&self.name);
        self.description = self.description.as_deref().map(unescape_quotes);
        self
    }
}

pub(crate) fn unescape_quotes(input: &str) -> String {
    input.replace("\\'", "'")
}

/// Server-issued challenge for registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTokenResponse {
    pub challenge: String,
}

/// Signed challenge proof submitted back to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProof {
    /// The challenge string as issued.
    pub code: String,
    /// base64url Ed25519 signature over the challenge bytes.
    pub signature: String,
}

/// Cosmetic account profile chosen at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub color_a: String,
    pub color_b: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub public_key: String,
    pub challenge: ChallengeProof,
    /// Device name, AES-GCM encrypted with the account seed
    /// (`iv.ciphertext.tag`, base64 segments).
    pub device: String,
    pub profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recaptcha_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub public_key: String,
    pub challenge: ChallengeProof,
    pub device: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub user: String,
    /// Encrypted device-name blob, exactly as submitted.
    pub device: String,
}

/// Result of a completed login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub session: SessionResponse,
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
}
