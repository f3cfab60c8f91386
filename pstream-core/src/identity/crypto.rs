//! Symmetric encryption of small payloads (the device name) with the
//! account seed as key material.
//!
//! Wire format is byte-compatible with the backend's expectations:
//! `"{base64(iv)}.{base64(ciphertext)}.{base64(tag)}"`, AES-256-GCM with a
//! 16-byte IV and a 128-bit tag.

use aes_gcm::{
    aead::{
        generic_array::{typenum::U16, GenericArray},
        rand_core::RngCore,
        Aead, KeyInit, OsRng,
    },
    aes::Aes256,
    AesGcm, Key,
};

use crate::{Error, Result};

/// AES-256-GCM with the 16-byte IV the wire format mandates.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

const KEY_SIZE: usize = 32;
const IV_SIZE: usize = 16;
const TAG_SIZE: usize = 16;

fn cipher_for(secret: &[u8]) -> Result<Aes256Gcm16> {
    if secret.len() != KEY_SIZE {
        return Err(Error::InvalidKeyLength {
            expected: KEY_SIZE,
            got: secret.len(),
        });
    }
    let key = Key::<Aes256Gcm16>::from_slice(secret);
    Ok(Aes256Gcm16::new(key))
}

fn b64_encode(data: &[u8]) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, data)
}

fn b64_decode(segment: &str, what: &str) -> Result<Vec<u8>> {
    base64::Engine::decode(&base64::engine::general_purpose::STANDARD, segment)
        .map_err(|e| Error::InvalidEncoding(format!("Invalid base64 in {what} segment: {e}")))
}

/// Encrypt `plaintext` with a 32-byte secret into the dot-joined blob format.
pub fn encrypt_data(plaintext: &str, secret: &[u8]) -> Result<String> {
    let cipher = cipher_for(secret)?;

    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    let nonce = GenericArray::from_slice(&iv);

    // Aead::encrypt appends the tag to the ciphertext; the wire format wants
    // them as separate segments.
    let mut combined = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| Error::Crypto("Encryption failed".to_string()))?;
    let tag = combined.split_off(combined.len() - TAG_SIZE);

    Ok(format!(
        "{}.{}.{}",
        b64_encode(&iv),
        b64_encode(&combined),
        b64_encode(&tag)
    ))
}

/// Exact inverse of [`encrypt_data`].
///
/// Fails loudly on malformed input or when the authentication tag does not
/// verify; there is no fallback path to plaintext.
pub fn decrypt_data(data: &str, secret: &[u8]) -> Result<String> {
    let cipher = cipher_for(secret)?;

    let segments: Vec<&str> = data.split('.').collect();
    let (iv_b64, ct_b64, tag_b64) = match segments.as_slice() {
        [iv, ct, tag] => (*iv, *ct, *tag),
        _ => {
            return Err(Error::InvalidEncoding(format!(
                "Encrypted blob must have 3 dot-joined segments, got {}",
                segments.len()
            )))
        }
    };

    let iv = b64_decode(iv_b64, "iv")?;
    if iv.len() != IV_SIZE {
        return Err(Error::InvalidEncoding(format!(
            "IV must be {IV_SIZE} bytes, got {}",
            iv.len()
        )));
    }
    let mut ciphertext = b64_decode(ct_b64, "ciphertext")?;
    let tag = b64_decode(tag_b64, "tag")?;
    if tag.len() != TAG_SIZE {
        return Err(Error::InvalidEncoding(format!(
            "Tag must be {TAG_SIZE} bytes, got {}",
            tag.len()
        )));
    }
    ciphertext.extend_from_slice(&tag);

    let nonce = GenericArray::from_slice(&iv);
    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| Error::Crypto("Decryption failed (tag mismatch or corrupted data)".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| Error::InvalidEncoding(format!("Decrypted payload is not UTF-8: {e}")))
}
