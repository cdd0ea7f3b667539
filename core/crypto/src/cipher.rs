//! Reversible obfuscation of sensitive field values.
//!
//! Each plaintext byte is XORed with the field key cycled to the plaintext
//! length, then base64-encoded so the result is safe to store in a plain
//! string field alongside unencrypted siblings.
//!
//! This is an at-rest obfuscation layer, not a security boundary against a
//! compromised data store: there is no nonce and no authentication tag, and
//! equal plaintexts under the same key produce equal ciphertexts. The
//! interface is shaped so an AEAD can replace the internals without
//! touching callers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::keys::{FieldKey, KEY_LENGTH};

/// Encrypt a field value with the given key.
///
/// Defined for the empty string (encodes the empty byte sequence) and for
/// arbitrary Unicode input (operates on the UTF-8 byte sequence).
///
/// # Postconditions
/// - `decrypt(encrypt(x, k), k) == x` for all `x` and `k`
pub fn encrypt(plaintext: &str, key: &FieldKey) -> String {
    let key_bytes = key.as_bytes();
    let mixed: Vec<u8> = plaintext
        .bytes()
        .enumerate()
        .map(|(i, b)| b ^ key_bytes[i % KEY_LENGTH])
        .collect();
    STANDARD.encode(mixed)
}

/// Decrypt a field value with the given key.
///
/// Exact inverse of [`encrypt`] for the same key. On malformed input
/// (invalid base64, or a result that is not valid UTF-8 because the key is
/// wrong or the field was never encrypted) this returns an empty string
/// rather than an error: it runs on display paths that must not crash.
pub fn decrypt(ciphertext: &str, key: &FieldKey) -> String {
    let raw = match STANDARD.decode(ciphertext) {
        Ok(raw) => raw,
        Err(_) => return String::new(),
    };

    let key_bytes = key.as_bytes();
    let mixed: Vec<u8> = raw
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ key_bytes[i % KEY_LENGTH])
        .collect();

    String::from_utf8(mixed).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wealthsense_common::UserId;

    fn test_key() -> FieldKey {
        FieldKey::derive(&UserId::new("test-user").unwrap())
    }

    #[test]
    fn test_round_trip() {
        let key = test_key();
        let ciphertext = encrypt("000111222333", &key);

        assert_ne!(ciphertext, "000111222333");
        assert_eq!(decrypt(&ciphertext, &key), "000111222333");
    }

    #[test]
    fn test_round_trip_empty() {
        let key = test_key();
        assert_eq!(decrypt(&encrypt("", &key), &key), "");
    }

    #[test]
    fn test_round_trip_unicode() {
        let key = test_key();
        let plaintext = "खाता ₹ 12345 ✓";

        assert_eq!(decrypt(&encrypt(plaintext, &key), &key), plaintext);
    }

    #[test]
    fn test_round_trip_longer_than_key() {
        let key = test_key();
        let plaintext = "9".repeat(1000);

        assert_eq!(decrypt(&encrypt(&plaintext, &key), &key), plaintext);
    }

    #[test]
    fn test_decrypt_malformed_input() {
        let key = test_key();
        assert_eq!(decrypt("not-valid-base64!!", &key), "");
    }

    #[test]
    fn test_ciphertext_is_base64() {
        let key = test_key();
        let ciphertext = encrypt("4111111111111111", &key);

        assert!(STANDARD.decode(&ciphertext).is_ok());
    }

    proptest! {
        #[test]
        fn prop_round_trip(plaintext in ".*", user in "[a-z0-9-]{1,64}") {
            let key = FieldKey::derive(&UserId::new(user).unwrap());
            prop_assert_eq!(decrypt(&encrypt(&plaintext, &key), &key), plaintext);
        }

        #[test]
        fn prop_decrypt_never_panics(input in ".*") {
            let key = test_key();
            let _ = decrypt(&input, &key);
        }
    }
}
