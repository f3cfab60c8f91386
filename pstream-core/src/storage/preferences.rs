//! Persisted user preferences
//!
//! Scrape ordering and quality preferences live in the `preferences`
//! namespace of the local store. A missing record yields the defaults, so a
//! fresh installation needs no seeding step.

use std::sync::Arc;

use crate::models::{QualityPreference, ScrapePreferences};
use crate::storage::KvStore;
use crate::Result;

const NAMESPACE: &str = "preferences";
const SCRAPE_KEY: &str = "scrape";
const QUALITY_KEY: &str = "quality";

pub struct PreferenceStore {
    store: Arc<dyn KvStore>,
}

impl PreferenceStore {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn scrape(&self) -> Result<ScrapePreferences> {
        match self.store.get(NAMESPACE, SCRAPE_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(ScrapePreferences::default()),
        }
    }

    pub fn set_scrape(&self, preferences: &ScrapePreferences) -> Result<()> {
        self.store
            .set(NAMESPACE, SCRAPE_KEY, serde_json::to_value(preferences)?)
    }

    /// Record the source that last produced a stream, preserving the rest of
    /// the stored preferences.
    pub fn record_successful_source(&self, source_id: &str) -> Result<()> {
        let mut preferences = self.scrape()?;
        preferences.last_successful_source = Some(source_id.to_string());
        self.set_scrape(&preferences)
    }

    pub fn quality(&self) -> Result<QualityPreference> {
        match self.store.get(NAMESPACE, QUALITY_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(QualityPreference::default()),
        }
    }

    pub fn set_quality(&self, preference: &QualityPreference) -> Result<()> {
        self.store
            .set(NAMESPACE, QUALITY_KEY, serde_json::to_value(preference)?)
    }
}
