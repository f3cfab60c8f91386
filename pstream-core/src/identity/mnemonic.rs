use bip39::{Language, Mnemonic};

/// Minimum length for a custom (non-wordlist) passphrase.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Check whether `input` is usable as an account secret.
///
/// Two forms are accepted:
/// - a BIP-39 English mnemonic, validated against the wordlist and checksum
/// - a custom passphrase of at least 8 printable-ASCII characters
///
/// Custom passphrases deliberately share the same derivation path as real
/// mnemonics so users can pick something memorable. The 8-character floor is
/// a product decision, not a crypto one.
#[must_use]
pub fn verify_valid_mnemonic(input: &str) -> bool {
    if Mnemonic::parse_in_normalized(Language::English, input).is_ok() {
        return true;
    }
    is_valid_passphrase(input)
}

fn is_valid_passphrase(input: &str) -> bool {
    input.chars().count() >= MIN_PASSPHRASE_LEN
        && input.chars().all(|c| c == ' ' || c.is_ascii_graphic())
}
