//! Event protocol spoken by the scraping engine.
//!
//! A closed tagged union: the engine emits exactly one `Init`, then per
//! attempted source a `Start`, zero or more `Update`s, and optionally a
//! `DiscoverEmbeds`. The orchestrator is a passive consumer; the engine
//! decides when to stop.

use serde::{Deserialize, Serialize};

/// Status carried by an [`ScrapeEvent::Update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Success,
    Failure,
    NotFound,
}

/// An embed discovered while scraping a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEmbed {
    /// Unique id of this embed attempt within the run.
    pub id: String,
    /// Id of the embed scraper that will resolve it.
    pub embed_scraper_id: String,
}

/// One event from the engine, delivered synchronously from within `run_all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScrapeEvent {
    /// Full candidate source id list; seeds every segment as waiting.
    Init { sources: Vec<String> },
    /// The engine moved on to scraping this source or embed.
    Start { id: String },
    /// Progress refresh for the named segment.
    Update {
        id: String,
        percentage: f64,
        status: EventStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Embeds found under the named source.
    DiscoverEmbeds {
        source_id: String,
        embeds: Vec<DiscoveredEmbed>,
    },
}
