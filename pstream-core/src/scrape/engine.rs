//! Scraping engine contract
//!
//! The provider engine is an external collaborator: it owns provider
//! implementations, retry policy, and timeouts. This crate only defines the
//! narrow interface the orchestrator drives it through.

use async_trait::async_trait;

use crate::models::{CaptionListItem, LoadableStream, ScrapeMedia};

use super::event::ScrapeEvent;

/// A source provider known to the engine's registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub id: String,
    pub name: String,
}

/// One full scrape run over an ordered candidate list.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub media: ScrapeMedia,
    /// Sources to attempt, in order. Sources not listed are skipped.
    pub source_order: Vec<String>,
    /// Embed ranking; empty means the engine's own order.
    pub embed_order: Vec<String>,
}

/// A stream the engine settled on.
#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    pub source_id: String,
    pub stream: LoadableStream,
    pub captions: Vec<CaptionListItem>,
}

/// Engine-side failures.
///
/// "No stream found" is not an error: `run_all` returns `Ok(None)` for
/// exhaustion. Errors are reserved for conditions that invalidate the run
/// itself and propagate uncaught through the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid media descriptor: {0}")]
    InvalidMedia(String),

    #[error("Engine failure: {0}")]
    Internal(String),
}

/// Callback receiving engine events synchronously from within `run_all`.
pub type EventSink<'a> = dyn Fn(ScrapeEvent) + Send + Sync + 'a;

/// The external provider-scraping engine.
#[async_trait]
pub trait ScrapeEngine: Send + Sync {
    /// All source providers in the engine's registry.
    fn list_sources(&self) -> Vec<SourceListing>;

    /// Run the whole pipeline: attempt sources in the requested order,
    /// resolve embeds as discovered, and return the first stream found or
    /// `None` on exhaustion.
    async fn run_all(
        &self,
        request: ScrapeRequest,
        events: &EventSink<'_>,
    ) -> Result<Option<ScrapeOutput>, EngineError>;
}
