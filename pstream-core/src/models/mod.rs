pub mod caption;
pub mod media;
pub mod migration;
pub mod preferences;
pub mod stream;

pub use caption::{Caption, CaptionListItem, CUSTOM_CAPTION_ID, PASTED_CAPTION_ID};
pub use media::{EpisodeRef, MediaKey, ScrapeMedia, SeasonRef};
pub use migration::{ExportDocument, ExportedAccount};
pub use preferences::{QualityPreference, ScrapePreferences};
pub use stream::{LoadableStream, LoadedStream, Quality, QualityFile};
