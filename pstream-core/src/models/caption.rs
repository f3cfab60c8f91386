use serde::{Deserialize, Serialize};

/// Caption id used for captions typed/uploaded by the user.
pub const CUSTOM_CAPTION_ID: &str = "custom-caption";

/// Caption id used for captions pasted from the clipboard.
pub const PASTED_CAPTION_ID: &str = "pasted-caption";

/// A caption ready for display: the SRT payload has been fetched and decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub id: String,
    /// ISO 639-1 language code (e.g. "en", "de").
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub srt_data: String,
}

impl Caption {
    /// Custom and pasted captions are owned by the user, not by any provider
    /// list, and survive caption-list refreshes.
    #[must_use]
    pub fn is_user_provided(&self) -> bool {
        self.id == CUSTOM_CAPTION_ID || self.id == PASTED_CAPTION_ID
    }
}

/// An available caption as listed by a provider or subtitle catalog,
/// before its payload has been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionListItem {
    pub id: String,
    pub language: String,
    pub url: String,
    /// True when the caption host does not allow direct browser fetches.
    #[serde(default)]
    pub needs_proxy: bool,
    #[serde(default)]
    pub hearing_impaired: bool,
    /// Catalog that produced this entry (e.g. "opensubtitles").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}
