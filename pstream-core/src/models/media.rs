use serde::{Deserialize, Serialize};

/// Reference to a season within a show, as known to the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRef {
    pub number: u32,
    pub tmdb_id: String,
    pub title: String,
}

/// Reference to an episode within a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub number: u32,
    pub tmdb_id: String,
    pub title: String,
}

/// Descriptor of one scrapeable unit of media.
///
/// Immutable for the duration of a scrape attempt. A show descriptor always
/// pins a concrete season and episode; scraping a whole season is not a thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScrapeMedia {
    Movie {
        tmdb_id: String,
        title: String,
        release_year: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        imdb_id: Option<String>,
    },
    Show {
        tmdb_id: String,
        title: String,
        release_year: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        imdb_id: Option<String>,
        season: SeasonRef,
        episode: EpisodeRef,
    },
}

impl ScrapeMedia {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie { title, .. } | Self::Show { title, .. } => title,
        }
    }

    #[must_use]
    pub fn tmdb_id(&self) -> &str {
        match self {
            Self::Movie { tmdb_id, .. } | Self::Show { tmdb_id, .. } => tmdb_id,
        }
    }

    /// Stable key identifying this scrapeable unit.
    ///
    /// All per-media failure memory is indexed by this key. Two descriptors
    /// for the same movie (or the same show+season+episode) always map to the
    /// same key, regardless of title or imdb id differences.
    #[must_use]
    pub fn key(&self) -> MediaKey {
        match self {
            Self::Movie { tmdb_id, .. } => MediaKey(format!("movie-{tmdb_id}")),
            Self::Show {
                tmdb_id,
                season,
                episode,
                ..
            } => MediaKey(format!(
                "show-{tmdb_id}-{}-{}",
                season.tmdb_id, episode.tmdb_id
            )),
        }
    }
}

/// Key identifying one scrapeable unit (a movie, or show+season+episode).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaKey(String);

impl MediaKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
