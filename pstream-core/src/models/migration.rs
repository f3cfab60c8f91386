use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Flat export document bundling everything a user can carry between
/// installations.
///
/// Versioned only by `export_date`; there is no schema version field, so
/// readers must tolerate unknown shapes inside the opaque sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<ExportedAccount>,
    /// tmdb id → bookmark record, stored as-is.
    #[serde(default)]
    pub bookmarks: HashMap<String, JsonValue>,
    /// media key → progress record, stored as-is.
    #[serde(default)]
    pub progress: HashMap<String, JsonValue>,
    #[serde(default)]
    pub settings: HashMap<String, JsonValue>,
}

/// Account profile section of the export document.
///
/// Holds the public half of the identity only; the seed never leaves the
/// device through this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedAccount {
    pub backend_url: String,
    pub public_key: String,
    pub device_name: String,
}

impl ExportDocument {
    #[must_use]
    pub fn new(exported_at: DateTime<Utc>) -> Self {
        Self {
            export_date: exported_at,
            account: None,
            bookmarks: HashMap::new(),
            progress: HashMap::new(),
            settings: HashMap::new(),
        }
    }
}
