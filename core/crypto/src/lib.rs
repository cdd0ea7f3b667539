//! Cryptographic primitives for WealthSense.
//!
//! This module provides:
//! - Per-user field key derivation using blake2b
//! - Reversible field obfuscation for sensitive record values
//! - PIN digests and constant-time verification
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext field values, PINs, or key material are ever logged
//! - Constant-time operations for sensitive comparisons
//!
//! The field cipher is an at-rest obfuscation layer, not authenticated
//! encryption; see [`cipher`] for the exact contract.

pub mod cipher;
pub mod keys;
pub mod pin;

pub use cipher::{decrypt, encrypt};
pub use keys::{FieldKey, KEY_LENGTH};
pub use pin::{hash_pin, validate_pin, verify_pin, PIN_LENGTH};
