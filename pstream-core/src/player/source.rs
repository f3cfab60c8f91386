//! Player source slice
//!
//! Owns the current media descriptor, stream, caption list/selection, and
//! the per-media failure memory. Every mutation goes through this container;
//! the orchestrator and UI never touch the underlying maps directly.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::models::{
    Caption, CaptionListItem, LoadableStream, LoadedStream, MediaKey, Quality, QualityPreference,
    ScrapeMedia,
};

use super::subtitles::{fetch_caption_lists, SubtitleCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Idle,
    Scraping,
    Playing,
    ScrapeNotFound,
}

#[derive(Default)]
struct SourceState {
    meta: Option<ScrapeMedia>,
    media_key: Option<MediaKey>,
    status: Option<PlayerStatus>,
    stream: Option<LoadedStream>,
    start_at: f64,
    captions: Vec<CaptionListItem>,
    selected_caption: Option<Caption>,
    failed_sources: HashMap<MediaKey, Vec<String>>,
    failed_embeds: HashMap<MediaKey, HashMap<String, Vec<String>>>,
}

/// Pick the initial quality for a file-based stream.
///
/// Exact preference match wins; otherwise the best quality below the
/// preference, otherwise the lowest above it. Automatic mode (or no stored
/// preference) takes the best available.
#[must_use]
pub fn select_initial_quality(
    available: &[Quality],
    preference: &QualityPreference,
) -> Option<Quality> {
    if available.is_empty() {
        return None;
    }
    let best = available.iter().copied().max();

    if preference.automatic {
        return best;
    }
    let Some(wanted) = preference.last_chosen else {
        return best;
    };
    if available.contains(&wanted) {
        return Some(wanted);
    }
    available
        .iter()
        .copied()
        .filter(|q| *q < wanted)
        .max()
        .or_else(|| available.iter().copied().filter(|q| *q > wanted).min())
}

pub struct PlayerSource {
    state: RwLock<SourceState>,
    catalogs: Vec<Arc<dyn SubtitleCatalog>>,
    catalog_timeout: Duration,
}

impl Default for PlayerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SourceState::default()),
            catalogs: Vec::new(),
            catalog_timeout: Duration::from_secs(8),
        }
    }

    /// Attach external subtitle catalogs consulted after every
    /// [`set_source`](Self::set_source). Each catalog call is independently
    /// timeboxed to `timeout`.
    #[must_use]
    pub fn with_subtitle_catalogs(
        mut self,
        catalogs: Vec<Arc<dyn SubtitleCatalog>>,
        timeout: Duration,
    ) -> Self {
        self.catalogs = catalogs;
        self.catalog_timeout = timeout;
        self
    }

    // ===== meta =====

    /// Switch to new media.
    ///
    /// When the media key actually changes (not a refresh of the same key),
    /// failure memory recorded under the incoming key is cleared, so stale
    /// entries from an earlier session on that key cannot leak into the next
    /// scrape. Stream, captions, and selection are always reset.
    pub fn set_meta(&self, meta: ScrapeMedia, new_status: Option<PlayerStatus>) {
        let key = meta.key();
        let mut state = self.state.write();

        if state.media_key.as_ref() != Some(&key) {
            state.failed_sources.remove(&key);
            state.failed_embeds.remove(&key);
        }

        state.meta = Some(meta);
        state.media_key = Some(key);
        state.stream = None;
        state.start_at = 0.0;
        state.captions.clear();
        state.selected_caption = None;
        if let Some(status) = new_status {
            state.status = Some(status);
        }
    }

    pub fn set_status(&self, status: PlayerStatus) {
        self.state.write().status = Some(status);
    }

    #[must_use]
    pub fn status(&self) -> Option<PlayerStatus> {
        self.state.read().status
    }

    #[must_use]
    pub fn meta(&self) -> Option<ScrapeMedia> {
        self.state.read().meta.clone()
    }

    #[must_use]
    pub fn media_key(&self) -> Option<MediaKey> {
        self.state.read().media_key.clone()
    }

    // ===== stream =====

    /// Accept a stream from the orchestrator.
    ///
    /// Normalizes the descriptor into playback-ready form, picks the initial
    /// quality from the user preference, installs the provider captions, and
    /// kicks off external-subtitle enrichment in the background. Playback
    /// start is never blocked on enrichment.
    pub fn set_source(
        self: &Arc<Self>,
        stream: LoadableStream,
        captions: Vec<CaptionListItem>,
        start_at: f64,
        quality_preference: &QualityPreference,
    ) {
        let selected_quality =
            select_initial_quality(&stream.available_qualities(), quality_preference);
        {
            let mut state = self.state.write();
            state.stream = Some(LoadedStream {
                stream,
                selected_quality,
            });
            state.start_at = start_at;
            state.captions = captions;
            Self::revalidate_caption_selection(&mut state);
        }

        if !self.catalogs.is_empty() {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                this.enrich_captions().await;
            });
        }
    }

    /// Fetch caption lists from all configured catalogs and merge them in.
    ///
    /// Public so callers that need deterministic sequencing (tests, preload
    /// paths) can await it directly.
    pub async fn enrich_captions(&self) {
        let Some(meta) = self.meta() else {
            return;
        };
        let items = fetch_caption_lists(&self.catalogs, &meta, self.catalog_timeout).await;
        if !items.is_empty() {
            self.merge_caption_items(items);
        }
    }

    #[must_use]
    pub fn current_stream(&self) -> Option<LoadedStream> {
        self.state.read().stream.clone()
    }

    #[must_use]
    pub fn start_at(&self) -> f64 {
        self.state.read().start_at
    }

    pub fn set_quality(&self, quality: Quality) {
        if let Some(stream) = self.state.write().stream.as_mut() {
            stream.selected_quality = Some(quality);
        }
    }

    // ===== captions =====

    #[must_use]
    pub fn captions(&self) -> Vec<CaptionListItem> {
        self.state.read().captions.clone()
    }

    #[must_use]
    pub fn selected_caption(&self) -> Option<Caption> {
        self.state.read().selected_caption.clone()
    }

    pub fn set_caption(&self, caption: Option<Caption>) {
        self.state.write().selected_caption = caption;
    }

    /// Merge additional caption list entries (deduplicated by id) and make
    /// sure the current selection still points at something real.
    pub fn merge_caption_items(&self, items: Vec<CaptionListItem>) {
        let mut state = self.state.write();
        for item in items {
            if !state.captions.iter().any(|existing| existing.id == item.id) {
                state.captions.push(item);
            }
        }
        Self::revalidate_caption_selection(&mut state);
    }

    /// Replace the caption list wholesale, then revalidate the selection.
    pub fn set_caption_list(&self, items: Vec<CaptionListItem>) {
        let mut state = self.state.write();
        state.captions = items;
        Self::revalidate_caption_selection(&mut state);
    }

    /// Selection rules after a list change: user-provided captions are
    /// exempt; a selection still present in the list stays; otherwise fall
    /// back to another caption in the same language; otherwise clear.
    fn revalidate_caption_selection(state: &mut SourceState) {
        let Some(selected) = state.selected_caption.as_ref() else {
            return;
        };
        if selected.is_user_provided() {
            return;
        }
        if state.captions.iter().any(|item| item.id == selected.id) {
            return;
        }

        let language = selected.language.clone();
        state.selected_caption = state
            .captions
            .iter()
            .find(|item| item.language == language)
            .map(|item| Caption {
                id: item.id.clone(),
                language: item.language.clone(),
                url: Some(item.url.clone()),
                // Payload is fetched lazily when the caption is rendered.
                srt_data: String::new(),
            });
    }

    // ===== failure memory =====

    /// Record a failed source for the current media. Idempotent; a no-op
    /// when no media is set (there is nothing to attribute the failure to).
    pub fn add_failed_source(&self, source_id: &str) {
        let mut state = self.state.write();
        let Some(key) = state.media_key.clone() else {
            tracing::warn!(source_id, "Failed source dropped: no media set");
            return;
        };
        let entry = state.failed_sources.entry(key).or_default();
        if !entry.iter().any(|id| id == source_id) {
            entry.push(source_id.to_string());
        }
    }

    /// Record a failed embed under a source for the current media.
    pub fn add_failed_embed(&self, source_id: &str, embed_id: &str) {
        let mut state = self.state.write();
        let Some(key) = state.media_key.clone() else {
            tracing::warn!(source_id, embed_id, "Failed embed dropped: no media set");
            return;
        };
        let entry = state
            .failed_embeds
            .entry(key)
            .or_default()
            .entry(source_id.to_string())
            .or_default();
        if !entry.iter().any(|id| id == embed_id) {
            entry.push(embed_id.to_string());
        }
    }

    #[must_use]
    pub fn failed_sources_for(&self, key: &MediaKey) -> Vec<String> {
        self.state
            .read()
            .failed_sources
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Union of failed embed ids across all sources for this media.
    #[must_use]
    pub fn failed_embeds_for(&self, key: &MediaKey) -> Vec<String> {
        let state = self.state.read();
        let mut out: Vec<String> = Vec::new();
        if let Some(per_source) = state.failed_embeds.get(key) {
            for ids in per_source.values() {
                for id in ids {
                    if !out.contains(id) {
                        out.push(id.clone());
                    }
                }
            }
        }
        out
    }

    /// Wipe both failure maps for this media (fresh start next attempt).
    pub fn clear_failure_memory(&self, key: &MediaKey) {
        let mut state = self.state.write();
        state.failed_sources.remove(key);
        state.failed_embeds.remove(key);
    }
}
