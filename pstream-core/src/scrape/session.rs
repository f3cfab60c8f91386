//! Per-attempt segment state machine
//!
//! One segment per source (and per discovered embed). Legal transitions:
//!
//! ```text
//! Waiting -> Pending -> Success | Failure | NotFound
//! Waiting -> NotFound            (engine skipped the segment)
//! ```
//!
//! Terminal states never transition again. At most one segment is pending at
//! a time: when the engine starts a new segment, a still-pending previous
//! segment is deemed successful — it did not hard-fail before the engine
//! moved on, which is not the same as having produced a stream.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::event::{DiscoveredEmbed, EventStatus, ScrapeEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    Waiting,
    Pending,
    Success,
    Failure,
    NotFound,
}

impl SegmentStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::NotFound)
    }
}

/// Lifecycle of one source or embed attempt, as shown to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    /// Set when this segment is an embed discovered under a source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_of: Option<String>,
    pub status: SegmentStatus,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Segment {
    fn waiting(id: String, name: String, embed_of: Option<String>) -> Self {
        Self {
            id,
            name,
            embed_of,
            status: SegmentStatus::Waiting,
            percentage: 0.0,
            reason: None,
            error: None,
        }
    }
}

/// Segment bookkeeping for one scrape attempt.
///
/// Keeps insertion order so the UI shows candidates in attempt order.
pub struct ScrapeSession {
    names: HashMap<String, String>,
    segments: IndexMap<String, Segment>,
    current_pending: Option<String>,
}

impl ScrapeSession {
    /// `names` maps source ids to display names (from the registry listing).
    #[must_use]
    pub fn new(names: HashMap<String, String>) -> Self {
        Self {
            names,
            segments: IndexMap::new(),
            current_pending: None,
        }
    }

    /// Apply one engine event.
    pub fn apply(&mut self, event: &ScrapeEvent) {
        match event {
            ScrapeEvent::Init { sources } => self.on_init(sources),
            ScrapeEvent::Start { id } => self.on_start(id),
            ScrapeEvent::Update {
                id,
                percentage,
                status,
                reason,
                error,
            } => self.on_update(id, *percentage, *status, reason.clone(), error.clone()),
            ScrapeEvent::DiscoverEmbeds { source_id, embeds } => {
                self.on_discover_embeds(source_id, embeds);
            }
        }
    }

    fn display_name(&self, id: &str) -> String {
        self.names.get(id).cloned().unwrap_or_else(|| id.to_string())
    }

    fn on_init(&mut self, sources: &[String]) {
        for id in sources {
            let segment = Segment::waiting(id.clone(), self.display_name(id), None);
            self.segments.insert(id.clone(), segment);
        }
    }

    fn on_start(&mut self, id: &str) {
        // The engine advanced: a segment still pending at this point did not
        // hard-fail, so it settles as success.
        if let Some(previous) = self.current_pending.take() {
            if previous != id {
                if let Some(segment) = self.segments.get_mut(&previous) {
                    if segment.status == SegmentStatus::Pending {
                        segment.status = SegmentStatus::Success;
                        segment.percentage = 100.0;
                    }
                }
            }
        }

        let name = self.display_name(id);
        let segment = self
            .segments
            .entry(id.to_string())
            .or_insert_with(|| Segment::waiting(id.to_string(), name, None));
        if !segment.status.is_terminal() {
            segment.status = SegmentStatus::Pending;
            self.current_pending = Some(id.to_string());
        }
    }

    fn on_update(
        &mut self,
        id: &str,
        percentage: f64,
        status: EventStatus,
        reason: Option<String>,
        error: Option<String>,
    ) {
        let Some(segment) = self.segments.get_mut(id) else {
            tracing::debug!(id, "Update for unknown segment ignored");
            return;
        };
        if segment.status.is_terminal() {
            return;
        }

        segment.percentage = percentage;
        segment.reason = reason;
        segment.error = error;
        segment.status = match status {
            EventStatus::Pending => SegmentStatus::Pending,
            EventStatus::Success => SegmentStatus::Success,
            EventStatus::Failure => SegmentStatus::Failure,
            EventStatus::NotFound => SegmentStatus::NotFound,
        };

        if segment.status.is_terminal() && self.current_pending.as_deref() == Some(id) {
            self.current_pending = None;
        }
    }

    fn on_discover_embeds(&mut self, source_id: &str, embeds: &[DiscoveredEmbed]) {
        for embed in embeds {
            let segment = Segment::waiting(
                embed.id.clone(),
                embed.embed_scraper_id.clone(),
                Some(source_id.to_string()),
            );
            self.segments.insert(embed.id.clone(), segment);
        }
    }

    /// Segments in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Segment> {
        self.segments.values().cloned().collect()
    }

    #[must_use]
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.get(id)
    }
}
