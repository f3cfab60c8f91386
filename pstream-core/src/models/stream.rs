use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Video quality tier for file-based streams.
///
/// Ordered from lowest to highest so quality selection can fall back to
/// "nearest below" or "best available".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Unknown,
    #[serde(rename = "360")]
    Q360,
    #[serde(rename = "480")]
    Q480,
    #[serde(rename = "720")]
    Q720,
    #[serde(rename = "1080")]
    Q1080,
    #[serde(rename = "4k")]
    Q4k,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Q360 => "360",
            Self::Q480 => "480",
            Self::Q720 => "720",
            Self::Q1080 => "1080",
            Self::Q4k => "4k",
        };
        write!(f, "{name}")
    }
}

/// A single playable file at a fixed quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFile {
    pub url: String,
}

/// Stream descriptor as produced by the scraping engine.
///
/// Either a quality→file map or an HLS playlist. Headers, when present, must
/// be attached to every request for the stream (and are what the extension
/// bridge pre-registers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LoadableStream {
    File {
        qualities: BTreeMap<Quality, QualityFile>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        headers: HashMap<String, String>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        preferred_headers: HashMap<String, String>,
    },
    Hls {
        playlist: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        headers: HashMap<String, String>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        preferred_headers: HashMap<String, String>,
    },
}

impl LoadableStream {
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        match self {
            Self::File { headers, .. } | Self::Hls { headers, .. } => headers,
        }
    }

    #[must_use]
    pub fn preferred_headers(&self) -> &HashMap<String, String> {
        match self {
            Self::File {
                preferred_headers, ..
            }
            | Self::Hls {
                preferred_headers, ..
            } => preferred_headers,
        }
    }

    /// Qualities offered by this stream. HLS streams manage quality inside
    /// the playlist, so they report none.
    #[must_use]
    pub fn available_qualities(&self) -> Vec<Quality> {
        match self {
            Self::File { qualities, .. } => qualities.keys().copied().collect(),
            Self::Hls { .. } => Vec::new(),
        }
    }
}

/// A stream normalized into playback-ready form: the descriptor plus the
/// quality chosen for initial playback (file streams only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedStream {
    pub stream: LoadableStream,
    pub selected_quality: Option<Quality>,
}
