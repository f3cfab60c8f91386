//! Deterministic account identity
//!
//! The account keypair is re-derivable from a single user secret: a mnemonic
//! phrase or a passkey credential id. Both funnel through the same
//! PBKDF2-SHA256 seed derivation, so a passkey is a convenience layer over
//! the same identity mechanism rather than a separate identity.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::Sha256;

use crate::{Error, Result};

/// Seed length in bytes, also the Ed25519 secret key length.
pub const SEED_LEN: usize = 32;

/// BIP-39-style KDF parameters, applied regardless of secret source.
const KDF_SALT: &[u8] = b"mnemonic";
const KDF_ITERATIONS: u32 = 2048;

/// Account keypair plus the root seed it was derived from.
///
/// The seed is the root secret: it is what gets persisted locally (base64)
/// and everything else is re-derivable from it.
#[derive(Clone)]
pub struct Keys {
    signing_key: SigningKey,
    seed: [u8; SEED_LEN],
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("public_key", &self.public_key_base64url())
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

/// Derive the 32-byte root seed from a user secret.
///
/// `PBKDF2-HMAC-SHA256(password = secret, salt = "mnemonic", iterations = 2048)`.
/// Deterministic: the same secret always yields the same seed, which is the
/// entire account-recovery mechanism.
#[must_use]
pub fn derive_seed(secret: &str) -> [u8; SEED_LEN] {
    let mut seed = [0u8; SEED_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.as_bytes(), KDF_SALT, KDF_ITERATIONS, &mut seed);
    seed
}

impl Keys {
    /// Derive account keys from a mnemonic or custom passphrase.
    ///
    /// Validation happens at the call site via
    /// [`verify_valid_mnemonic`](super::verify_valid_mnemonic); this function
    /// derives keys from whatever it is given.
    #[must_use]
    pub fn from_mnemonic(mnemonic: &str) -> Self {
        Self::from_seed(derive_seed(mnemonic))
    }

    /// Derive account keys from a passkey credential id.
    ///
    /// Identical derivation path as [`Keys::from_mnemonic`]: a given passkey
    /// deterministically yields the same account keys on every device.
    #[must_use]
    pub fn from_credential_id(credential_id: &str) -> Self {
        Self::from_seed(derive_seed(credential_id))
    }

    /// Rebuild keys from a previously persisted seed.
    #[must_use]
    pub fn from_seed(seed: [u8; SEED_LEN]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key, seed }
    }

    /// Rebuild keys from the locally persisted base64 seed form.
    pub fn from_seed_base64(encoded: &str) -> Result<Self> {
        let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid seed base64: {e}")))?;
        let seed: [u8; SEED_LEN] = bytes.try_into().map_err(|v: Vec<u8>| Error::InvalidKeyLength {
            expected: SEED_LEN,
            got: v.len(),
        })?;
        Ok(Self::from_seed(seed))
    }

    #[must_use]
    pub fn seed(&self) -> &[u8; SEED_LEN] {
        &self.seed
    }

    /// Seed in the form persisted to local storage.
    #[must_use]
    pub fn seed_base64(&self) -> String {
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, self.seed)
    }

    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key in the base64url form submitted to the backend.
    #[must_use]
    pub fn public_key_base64url(&self) -> String {
        base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            self.public_key_bytes(),
        )
    }

    /// Sign a server-issued challenge string.
    ///
    /// Returns the base64url signature submitted alongside the public key,
    /// proving control of the seed without ever transmitting it.
    #[must_use]
    pub fn sign_challenge(&self, challenge: &str) -> String {
        let signature = self.signing_key.sign(challenge.as_bytes());
        base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            signature.to_bytes(),
        )
    }

    /// Verify a base64url signature over `message` against this keypair.
    pub fn verify(&self, message: &str, signature_b64url: &str) -> Result<()> {
        let raw = base64::Engine::decode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            signature_b64url,
        )
        .map_err(|e| Error::InvalidEncoding(format!("Invalid signature base64: {e}")))?;
        let sig_bytes: [u8; 64] = raw.try_into().map_err(|v: Vec<u8>| Error::InvalidKeyLength {
            expected: 64,
            got: v.len(),
        })?;
        let signature = Signature::from_bytes(&sig_bytes);
        self.signing_key
            .verifying_key()
            .verify(message.as_bytes(), &signature)
            .map_err(|_| Error::Crypto("Signature verification failed".to_string()))
    }
}
