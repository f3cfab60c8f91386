//! Pure HTTP clients for P-Stream's external collaborators
//!
//! No domain logic lives here: `pstream-core` defines the traits and the
//! orchestration; this crate supplies reqwest-backed implementations for the
//! self-hosted backend, subtitle catalogs, and the translation API.

pub mod client;
pub mod error;
pub mod subtitles;
pub mod translate;
pub mod types;

pub use client::BackendClient;
pub use error::{BackendError, MAX_RESPONSE_SIZE};
pub use subtitles::{HttpSubtitleCatalog, HttpSubtitleFetcher};
pub use translate::HttpTranslator;
pub use types::{
    BackendMeta, ChallengeProof, ChallengeTokenResponse, LoginRequest, LoginResponse,
    RegisterRequest, SessionResponse, UserProfile, UserResponse,
};
