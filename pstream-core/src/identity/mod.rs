// Identity & Crypto Layer
//
// Deterministic Ed25519 identity derived from a user secret, challenge
// signing, and AEAD encryption of small payloads. No password ever reaches
// the backend; the 32-byte seed is the root secret.

pub mod credentials;
pub mod crypto;
pub mod keys;
pub mod mnemonic;

pub use credentials::CredentialStore;
pub use crypto::{decrypt_data, encrypt_data};
pub use keys::{derive_seed, Keys, SEED_LEN};
pub use mnemonic::verify_valid_mnemonic;
