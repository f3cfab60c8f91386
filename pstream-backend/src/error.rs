//! Shared backend client error types

use thiserror::Error;

/// Maximum response body size for backend HTTP calls (4 MB).
/// Prevents OOM from a misconfigured or hostile backend.
pub const MAX_RESPONSE_SIZE: usize = 4 * 1024 * 1024;

/// Common error type for all HTTP clients in this crate.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backend rejected our credentials (400/401/403 on an
    /// authenticated call). Callers must drop the session and return to
    /// login; retrying with the same token is pointless.
    #[error("Session rejected by backend, forcing logout")]
    ForceLogout,

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

/// Read a response body with size limit and deserialize as JSON.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let bytes = bytes_with_limit(response).await?;
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Read a response body with size limit as UTF-8 text.
pub async fn text_with_limit(response: reqwest::Response) -> Result<String, BackendError> {
    let bytes = bytes_with_limit(response).await?;
    String::from_utf8(bytes).map_err(|e| BackendError::Parse(e.to_string()))
}

async fn bytes_with_limit(response: reqwest::Response) -> Result<Vec<u8>, BackendError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(BackendError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(BackendError::ResponseTooLarge {
            size: bytes.len() as u64,
        });
    }
    Ok(bytes.to_vec())
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(BackendError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

/// Like [`check_response`], for calls made with a session token: credential
/// rejections become [`BackendError::ForceLogout`].
pub fn check_auth_response(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    use reqwest::StatusCode;
    match resp.status() {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(BackendError::ForceLogout)
        }
        _ => check_response(resp),
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<BackendError> for pstream_core::Error {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => Self::InvalidInput(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}
