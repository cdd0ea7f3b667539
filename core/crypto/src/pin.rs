//! PIN digests and verification.
//!
//! A user's PIN gates the tracking view. The PIN itself is never persisted:
//! only a salted one-way digest is stored, and verification recomputes the
//! digest and compares in constant time.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use subtle::ConstantTimeEq;

use wealthsense_common::{Error, Result};

/// Required PIN length in digits.
pub const PIN_LENGTH: usize = 4;

/// Domain-separation salt for PIN digests.
const PIN_DIGEST_SALT: &[u8] = b"wealthsense-pin-v1";

/// Compute the one-way digest of a PIN.
///
/// Deterministic across runs and sessions. Accepts any string and hashes
/// it uniformly; format enforcement belongs to the caller (see
/// [`validate_pin`]).
pub fn hash_pin(pin: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let mut hasher = Blake2b::<U32>::new();
    hasher.update(PIN_DIGEST_SALT);
    hasher.update(pin.as_bytes());

    STANDARD.encode(hasher.finalize())
}

/// Verify a PIN against a stored digest.
///
/// Recomputes the digest and compares in constant time; plaintext PINs are
/// never compared directly. Returns `false` for any digest that does not
/// match, including garbage digests of the wrong length.
pub fn verify_pin(pin: &str, digest: &str) -> bool {
    let expected = hash_pin(pin);
    expected.len() == digest.len()
        && bool::from(expected.as_bytes().ct_eq(digest.as_bytes()))
}

/// Validate the PIN format: exactly [`PIN_LENGTH`] ASCII digits.
///
/// # Errors
/// - `Error::Validation` if the PIN has the wrong length or contains
///   non-digit characters
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() != PIN_LENGTH || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Validation(format!(
            "PIN must be exactly {} digits",
            PIN_LENGTH
        )));
    }
    Ok(())
}
