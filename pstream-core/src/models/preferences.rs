use serde::{Deserialize, Serialize};

use super::stream::Quality;

/// User preferences consulted when ordering scrape candidates.
///
/// Persisted in the `preferences` namespace of the local store; a missing
/// record deserializes to the defaults (no custom ordering, prioritization
/// on).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapePreferences {
    /// When true, `source_order` ranks sources ahead of the registry order.
    pub enable_source_order: bool,
    pub source_order: Vec<String>,

    /// When true, `embed_order` is handed to the engine as the embed ranking.
    pub enable_embed_order: bool,
    pub embed_order: Vec<String>,

    /// Move the source that last produced a stream to the front.
    pub prioritize_last_successful: bool,
    pub last_successful_source: Option<String>,
}

impl Default for ScrapePreferences {
    fn default() -> Self {
        Self {
            enable_source_order: false,
            source_order: Vec::new(),
            enable_embed_order: false,
            embed_order: Vec::new(),
            prioritize_last_successful: true,
            last_successful_source: None,
        }
    }
}

/// User preference for initial playback quality of file-based streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPreference {
    /// When true, ignore `last_chosen` and pick the best available quality.
    pub automatic: bool,
    pub last_chosen: Option<Quality>,
}

impl Default for QualityPreference {
    fn default() -> Self {
        Self {
            automatic: true,
            last_chosen: None,
        }
    }
}
