//! External subtitle catalogs
//!
//! Each catalog call is independently timeboxed and failure-isolated: one
//! dead provider never blocks or empties the aggregate result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{CaptionListItem, ScrapeMedia};
use crate::Result;

/// A third-party subtitle search service.
#[async_trait]
pub trait SubtitleCatalog: Send + Sync {
    fn id(&self) -> &str;

    /// Search for captions matching the media descriptor.
    async fn search(&self, media: &ScrapeMedia) -> Result<Vec<CaptionListItem>>;
}

/// Query every catalog, racing each against `timeout`.
///
/// Failures and timeouts degrade to an empty list for that catalog.
pub async fn fetch_caption_lists(
    catalogs: &[Arc<dyn SubtitleCatalog>],
    media: &ScrapeMedia,
    timeout: Duration,
) -> Vec<CaptionListItem> {
    let searches = catalogs.iter().map(|catalog| async move {
        match tokio::time::timeout(timeout, catalog.search(media)).await {
            Ok(Ok(items)) => items,
            Ok(Err(e)) => {
                tracing::warn!(catalog = catalog.id(), "Subtitle search failed: {e}");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(catalog = catalog.id(), "Subtitle search timed out");
                Vec::new()
            }
        }
    });

    futures::future::join_all(searches)
        .await
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct StaticCatalog {
        id: String,
        items: Vec<CaptionListItem>,
    }

    #[async_trait]
    impl SubtitleCatalog for StaticCatalog {
        fn id(&self) -> &str {
            &self.id
        }

        async fn search(&self, _media: &ScrapeMedia) -> Result<Vec<CaptionListItem>> {
            Ok(self.items.clone())
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl SubtitleCatalog for FailingCatalog {
        fn id(&self) -> &str {
            "failing"
        }

        async fn search(&self, _media: &ScrapeMedia) -> Result<Vec<CaptionListItem>> {
            Err(Error::Internal("catalog down".to_string()))
        }
    }

    struct HangingCatalog;

    #[async_trait]
    impl SubtitleCatalog for HangingCatalog {
        fn id(&self) -> &str {
            "hanging"
        }

        async fn search(&self, _media: &ScrapeMedia) -> Result<Vec<CaptionListItem>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn media() -> ScrapeMedia {
        ScrapeMedia::Movie {
            tmdb_id: "1".to_string(),
            title: "Movie".to_string(),
            release_year: 2020,
            imdb_id: None,
        }
    }

    fn item(id: &str) -> CaptionListItem {
        CaptionListItem {
            id: id.to_string(),
            language: "en".to_string(),
            url: format!("https://subs.example.com/{id}.srt"),
            needs_proxy: false,
            hearing_impaired: false,
            provider: None,
            encoding: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dead_catalogs_do_not_empty_aggregate() {
        let catalogs: Vec<Arc<dyn SubtitleCatalog>> = vec![
            Arc::new(StaticCatalog {
                id: "good".to_string(),
                items: vec![item("a"), item("b")],
            }),
            Arc::new(FailingCatalog),
            Arc::new(HangingCatalog),
        ];

        let items = fetch_caption_lists(&catalogs, &media(), Duration::from_secs(5)).await;
        assert_eq!(items.len(), 2);
    }
}
