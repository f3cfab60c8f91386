//! Credential mapping
//!
//! Local-only record of which passkey credential corresponds to a derived
//! keypair, so passkey login can skip mnemonic entry. Keyed by
//! `"{backend_url}::{public_key_base64url}"` because the same public key may
//! exist on several backends.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::storage::KvStore;
use crate::{Error, Result};

const NAMESPACE: &str = "credentials";

pub struct CredentialStore {
    store: Arc<dyn KvStore>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn entry_key(backend_url: &str, public_key_b64url: &str) -> String {
        format!("{backend_url}::{public_key_b64url}")
    }

    /// Remember which credential id derives the given public key.
    pub fn remember(
        &self,
        backend_url: &str,
        public_key_b64url: &str,
        credential_id: &str,
    ) -> Result<()> {
        self.store.set(
            NAMESPACE,
            &Self::entry_key(backend_url, public_key_b64url),
            JsonValue::String(credential_id.to_string()),
        )
    }

    /// Recall the credential id for a backend/public-key pair, if any.
    pub fn recall(&self, backend_url: &str, public_key_b64url: &str) -> Result<Option<String>> {
        match self
            .store
            .get(NAMESPACE, &Self::entry_key(backend_url, public_key_b64url))?
        {
            None => Ok(None),
            Some(JsonValue::String(id)) => Ok(Some(id)),
            Some(other) => Err(Error::Storage(format!(
                "Credential entry is not a string: {other}"
            ))),
        }
    }

    pub fn forget(&self, backend_url: &str, public_key_b64url: &str) -> Result<()> {
        self.store
            .remove(NAMESPACE, &Self::entry_key(backend_url, public_key_b64url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_remember_and_recall() {
        let creds = CredentialStore::new(MemoryStore::shared());
        creds
            .remember("https://backend.example.com", "pubkey-a", "cred-1")
            .unwrap();

        assert_eq!(
            creds
                .recall("https://backend.example.com", "pubkey-a")
                .unwrap(),
            Some("cred-1".to_string())
        );
        assert_eq!(creds.recall("https://other.example.com", "pubkey-a").unwrap(), None);
    }

    #[test]
    fn test_forget() {
        let creds = CredentialStore::new(MemoryStore::shared());
        creds.remember("https://b", "pk", "cred").unwrap();
        creds.forget("https://b", "pk").unwrap();
        assert_eq!(creds.recall("https://b", "pk").unwrap(), None);
    }
}
