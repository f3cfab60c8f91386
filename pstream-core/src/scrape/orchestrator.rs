//! Scrape orchestration
//!
//! Builds the candidate orderings from the registry, failure memory, and
//! user preferences, drives the engine through the event protocol, and
//! settles the outcome. The engine decides when to stop; no timeout is
//! imposed here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::models::{LoadableStream, ScrapeMedia, ScrapePreferences};
use crate::player::PlayerSource;
use crate::Result;

use super::engine::{EngineError, ScrapeEngine, ScrapeOutput, ScrapeRequest};
use super::event::ScrapeEvent;
use super::ordering::{build_embed_order, build_source_order};
use super::session::{ScrapeSession, Segment};

/// Companion browser extension, when active: pre-registers the request
/// headers a stream needs before playback starts.
#[async_trait]
pub trait ExtensionBridge: Send + Sync {
    async fn prepare_stream(&self, stream: &LoadableStream) -> Result<()>;
}

/// Terminal result of one scrape attempt.
#[derive(Debug)]
pub enum ScrapeOutcome {
    Found(ScrapeOutput),
    /// Exhaustion with no match. Carries the final segment snapshot and the
    /// ordering that was attempted, for the not-found screen's diagnostics.
    NotFound {
        segments: Vec<Segment>,
        source_order: Vec<String>,
    },
}

/// Callback receiving the segment snapshot after every engine event.
pub type ProgressSink<'a> = dyn Fn(Vec<Segment>) + Send + Sync + 'a;

pub struct ScrapeOrchestrator {
    engine: Arc<dyn ScrapeEngine>,
    source: Arc<PlayerSource>,
    bridge: Option<Arc<dyn ExtensionBridge>>,
}

impl ScrapeOrchestrator {
    #[must_use]
    pub fn new(engine: Arc<dyn ScrapeEngine>, source: Arc<PlayerSource>) -> Self {
        Self {
            engine,
            source,
            bridge: None,
        }
    }

    #[must_use]
    pub fn with_extension_bridge(mut self, bridge: Arc<dyn ExtensionBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Scrape `media` from the top of the ordering.
    pub async fn start_scraping(
        &self,
        media: &ScrapeMedia,
        preferences: &ScrapePreferences,
    ) -> std::result::Result<ScrapeOutcome, EngineError> {
        self.run(media, preferences, None, None).await
    }

    /// Like [`start_scraping`](Self::start_scraping) with a progress callback.
    pub async fn start_scraping_with_progress(
        &self,
        media: &ScrapeMedia,
        preferences: &ScrapePreferences,
        progress: &ProgressSink<'_>,
    ) -> std::result::Result<ScrapeOutcome, EngineError> {
        self.run(media, preferences, None, Some(progress)).await
    }

    /// Resume a previous attempt strictly after `start_from_source`.
    ///
    /// Produces the same ordering the original attempt would have, minus
    /// everything up to and including the resume source, so resuming never
    /// reorders the remaining candidates.
    pub async fn resume_scraping(
        &self,
        media: &ScrapeMedia,
        preferences: &ScrapePreferences,
        start_from_source: &str,
    ) -> std::result::Result<ScrapeOutcome, EngineError> {
        self.run(media, preferences, Some(start_from_source), None)
            .await
    }

    async fn run(
        &self,
        media: &ScrapeMedia,
        preferences: &ScrapePreferences,
        resume_after: Option<&str>,
        progress: Option<&ProgressSink<'_>>,
    ) -> std::result::Result<ScrapeOutcome, EngineError> {
        let key = media.key();
        let failed_sources = self.source.failed_sources_for(&key);
        let failed_embeds = self.source.failed_embeds_for(&key);

        let listings = self.engine.list_sources();
        let source_order =
            build_source_order(&listings, preferences, &failed_sources, resume_after);
        let embed_order = build_embed_order(preferences, &failed_embeds);
        tracing::debug!(
            media_key = %key,
            sources = source_order.len(),
            resumed = resume_after.is_some(),
            "Starting scrape run"
        );

        let names: HashMap<String, String> = listings
            .into_iter()
            .map(|listing| (listing.id, listing.name))
            .collect();
        let session = Mutex::new(ScrapeSession::new(names));

        let request = ScrapeRequest {
            media: media.clone(),
            source_order: source_order.clone(),
            embed_order,
        };
        let result = {
            let sink = |event: ScrapeEvent| {
                let mut session = session.lock();
                session.apply(&event);
                if let Some(progress) = progress {
                    progress(session.snapshot());
                }
            };
            self.engine.run_all(request, &sink).await?
        };

        match result {
            Some(output) => {
                // Fresh start for this media on the next attempt.
                self.source.clear_failure_memory(&key);
                tracing::info!(media_key = %key, source_id = %output.source_id, "Stream found");

                if let Some(bridge) = &self.bridge {
                    if let Err(e) = bridge.prepare_stream(&output.stream).await {
                        tracing::warn!("Extension header pre-registration failed: {e}");
                    }
                }
                Ok(ScrapeOutcome::Found(output))
            }
            None => {
                tracing::info!(media_key = %key, "Scrape exhausted with no stream");
                Ok(ScrapeOutcome::NotFound {
                    segments: session.into_inner().snapshot(),
                    source_order,
                })
            }
        }
    }
}
