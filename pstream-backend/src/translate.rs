//! HTTP caption translator
//!
//! Speaks the LibreTranslate-style `POST /translate` JSON API. Batching and
//! cancellation live in `pstream-core`; this client translates one text at a
//! time.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use pstream_core::player::CaptionTranslator;

use crate::error::{check_response, json_with_limit, BackendError};

static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(20))
        .build()
        .expect("Failed to build translate shared HTTP client")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

pub struct HttpTranslator {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpTranslator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            client: SHARED_CLIENT.clone(),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn translate_inner(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, BackendError> {
        let mut body = json!({
            "q": text,
            "source": "auto",
            "target": target_language,
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await?;
        let response = check_response(response)?;
        let translated: TranslateResponse = json_with_limit(response).await?;
        Ok(translated.translated_text)
    }
}

#[async_trait]
impl CaptionTranslator for HttpTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> pstream_core::Result<String> {
        Ok(self.translate_inner(text, target_language).await?)
    }
}
