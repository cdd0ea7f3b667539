//! Key types with secure memory handling.
//!
//! Field keys are derived on demand and never persisted. They zeroize
//! their memory on drop to prevent key material from lingering.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use wealthsense_common::UserId;

/// Length of field keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Fixed application salt mixed into every field key derivation.
const FIELD_KEY_SALT: &[u8] = b"wealthsense-fieldkey-v1";

/// Per-user key for obfuscating sensitive record fields.
///
/// Derived deterministically from the user's stable identifier: the same
/// user always yields the same key, and distinct users yield distinct keys.
/// The key is recomputed on demand and never stored.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FieldKey {
    key: [u8; KEY_LENGTH],
}

impl FieldKey {
    /// Derive the field key for a user.
    ///
    /// # Postconditions
    /// - `derive(a) == derive(a)` for any user id `a`
    /// - Distinct user ids yield distinct keys
    pub fn derive(user: &UserId) -> Self {
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(FIELD_KEY_SALT);
        hasher.update(user.as_str().as_bytes());
        hasher.update(b"fieldkey");

        let result = hasher.finalize();
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&result);
        Self { key }
    }

    /// Create a field key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldKey([REDACTED])")
    }
}
