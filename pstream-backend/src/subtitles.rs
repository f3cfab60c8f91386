//! HTTP subtitle catalog and fetcher
//!
//! Implements the `pstream-core` subtitle traits against a wyzie-style
//! subtitle search API and plain subtitle-file hosts.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use pstream_core::models::{CaptionListItem, ScrapeMedia};
use pstream_core::player::{SubtitleCatalog, SubtitleFetcher};

use crate::error::{check_response, json_with_limit, text_with_limit, BackendError};

static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()
        .expect("Failed to build subtitle shared HTTP client")
});

/// One search result from the catalog API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    id: String,
    url: String,
    language: String,
    #[serde(default)]
    is_hearing_impaired: bool,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Subtitle search service speaking the wyzie JSON format.
pub struct HttpSubtitleCatalog {
    id: String,
    base_url: String,
    client: Client,
}

impl HttpSubtitleCatalog {
    pub fn new(id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: SHARED_CLIENT.clone(),
        }
    }

    async fn search_inner(&self, media: &ScrapeMedia) -> Result<Vec<CaptionListItem>, BackendError> {
        let mut request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("id", media.tmdb_id())]);
        if let ScrapeMedia::Show {
            season, episode, ..
        } = media
        {
            request = request.query(&[
                ("season", season.number.to_string()),
                ("episode", episode.number.to_string()),
            ]);
        }

        let response = check_response(request.send().await?)?;
        let entries: Vec<CatalogEntry> = json_with_limit(response).await?;
        Ok(entries
            .into_iter()
            .map(|entry| CaptionListItem {
                id: format!("{}-{}", self.id, entry.id),
                language: entry.language,
                url: entry.url,
                needs_proxy: false,
                hearing_impaired: entry.is_hearing_impaired,
                provider: entry.source.or_else(|| Some(self.id.clone())),
                encoding: entry.encoding,
            })
            .collect())
    }
}

#[async_trait]
impl SubtitleCatalog for HttpSubtitleCatalog {
    fn id(&self) -> &str {
        &self.id
    }

    async fn search(&self, media: &ScrapeMedia) -> pstream_core::Result<Vec<CaptionListItem>> {
        Ok(self.search_inner(media).await?)
    }
}

/// Plain HTTP fetcher for subtitle payloads.
pub struct HttpSubtitleFetcher {
    client: Client,
}

impl Default for HttpSubtitleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSubtitleFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
        }
    }
}

#[async_trait]
impl SubtitleFetcher for HttpSubtitleFetcher {
    async fn fetch(&self, url: &str) -> pstream_core::Result<String> {
        let response = self.client.get(url).send().await.map_err(BackendError::from)?;
        let response = check_response(response)?;
        Ok(text_with_limit(response).await?)
    }
}
