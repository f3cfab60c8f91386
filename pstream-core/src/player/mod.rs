// Player state core
//
// The source slice owns stream/caption/failure state; translation and
// subtitle enrichment are separate services around it.

pub mod source;
pub mod srt;
pub mod subtitles;
pub mod translate;

pub use source::{select_initial_quality, PlayerSource, PlayerStatus};
pub use subtitles::{fetch_caption_lists, SubtitleCatalog};
pub use translate::{
    CaptionTranslationService, CaptionTranslator, SubtitleFetcher, TranslateStatus,
};
