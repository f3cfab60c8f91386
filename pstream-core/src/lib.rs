//! P-Stream client core
//!
//! The domain logic of the streaming client, free of any HTTP dependency:
//!
//! - [`identity`] — deterministic Ed25519 account identity derived from a
//!   mnemonic or passkey credential id, challenge signing, and the AES-GCM
//!   device-name blob format.
//! - [`scrape`] — source/embed ordering, the per-attempt segment state
//!   machine, and orchestration of the external provider engine.
//! - [`player`] — the source slice consuming orchestration output: streams,
//!   quality selection, captions, translation, failure memory.
//! - [`storage`] — the namespaced local key-value store.
//!
//! Network collaborators (backend, subtitle catalogs, translation API) are
//! traits here; `pstream-backend` provides the HTTP implementations.

pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod models;
pub mod player;
pub mod scrape;
pub mod storage;
pub mod util;

pub use config::Config;
pub use error::{Error, Result};
