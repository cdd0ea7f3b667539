//! PIN lock state machine for the tracking view.
//!
//! The lock gates visibility of sensitive records. Its state is derived
//! lazily from [`LockSettings`] and the current wall clock whenever the view
//! is entered; there are no background timers. Callers pass `now` explicitly,
//! which keeps transitions synchronous and testable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use wealthsense_common::{Error, Result};
use wealthsense_crypto::pin;

/// Minutes after which a prior unlock no longer counts as valid.
pub const IDLE_TIMEOUT_MINUTES: i64 = 5;

/// Persisted lock configuration, stored inside the tracking document.
///
/// Created implicitly (disabled) for every user. `pin_hash` is retained
/// when the lock is disabled so re-enabling can reuse it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_unlock: Option<DateTime<Utc>>,
}

/// State of the tracking view lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No PIN has ever been set; the lock cannot gate anything yet.
    Uninitialized,
    /// Sensitive records are visible.
    Unlocked,
    /// Sensitive records are hidden until a correct PIN is entered.
    Locked,
}

/// In-memory lock session for one view of the tracking page.
///
/// Owns a copy of the settings for the duration of the session; the caller
/// persists them back via [`SessionLock::into_settings`] after transitions
/// that change them.
#[derive(Debug, Clone)]
pub struct SessionLock {
    settings: LockSettings,
    state: LockState,
}

impl SessionLock {
    /// Resume a session from persisted settings.
    ///
    /// # Postconditions
    /// - No PIN ever set → `Uninitialized`
    /// - Lock disabled → `Unlocked` (never gates)
    /// - Lock enabled → `Locked` unless the last unlock is within the idle
    ///   threshold
    pub fn resume(settings: LockSettings, now: DateTime<Utc>) -> Self {
        let state = Self::gate_state(&settings, now);
        Self { settings, state }
    }

    fn gate_state(settings: &LockSettings, now: DateTime<Utc>) -> LockState {
        if settings.pin_hash.is_none() {
            return LockState::Uninitialized;
        }
        if !settings.enabled {
            return LockState::Unlocked;
        }
        match settings.last_unlock {
            Some(last) if now - last <= Duration::minutes(IDLE_TIMEOUT_MINUTES) => {
                LockState::Unlocked
            }
            _ => LockState::Locked,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Check if sensitive records are currently hidden.
    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Get the current settings.
    pub fn settings(&self) -> &LockSettings {
        &self.settings
    }

    /// Consume the session, yielding the settings to persist.
    pub fn into_settings(self) -> LockSettings {
        self.settings
    }

    /// Set up a new PIN and enable the lock.
    ///
    /// # Preconditions
    /// - Session must not be locked (resetting a forgotten PIN is not
    ///   possible; see [`SessionLock::reset_pin`])
    ///
    /// # Postconditions
    /// - Digest of `pin` is stored, `enabled = true`, state is `Unlocked`
    ///
    /// # Errors
    /// - `Error::Validation` if the PIN is not exactly 4 digits or the
    ///   confirmation copy differs
    /// - `Error::NotPermitted` if called while locked
    pub fn setup_pin(&mut self, new_pin: &str, confirm: &str, now: DateTime<Utc>) -> Result<()> {
        if self.state == LockState::Locked {
            return Err(Error::NotPermitted(
                "Unlock before changing the PIN".to_string(),
            ));
        }

        pin::validate_pin(new_pin)?;
        if new_pin != confirm {
            return Err(Error::Validation("PINs do not match".to_string()));
        }

        self.settings.pin_hash = Some(pin::hash_pin(new_pin));
        self.settings.enabled = true;
        self.settings.created_at = Some(now);
        self.state = LockState::Unlocked;
        Ok(())
    }

    /// Attempt to unlock with a PIN.
    ///
    /// # Postconditions
    /// - On success, `last_unlock = now` and state is `Unlocked`
    /// - On failure, state remains `Locked`
    ///
    /// # Errors
    /// - `Error::NotPermitted` if no PIN is configured
    /// - `Error::InvalidPin` on verification failure; no retry limit applies
    pub fn unlock(&mut self, pin_input: &str, now: DateTime<Utc>) -> Result<()> {
        let Some(digest) = &self.settings.pin_hash else {
            return Err(Error::NotPermitted("No PIN configured".to_string()));
        };

        if !pin::verify_pin(pin_input, digest) {
            return Err(Error::InvalidPin);
        }

        self.settings.last_unlock = Some(now);
        self.state = LockState::Unlocked;
        Ok(())
    }

    /// Relock the view.
    ///
    /// A no-op unless the lock is enabled with a PIN set; a lock that could
    /// never be escaped is not entered.
    pub fn lock(&mut self) {
        if self.settings.enabled && self.settings.pin_hash.is_some() {
            self.state = LockState::Locked;
        }
    }

    /// Disable the lock.
    ///
    /// Requires no PIN re-entry; the digest is retained for re-enabling.
    /// State becomes `Unlocked` until re-enabled.
    pub fn disable(&mut self) {
        self.settings.enabled = false;
        self.settings.last_unlock = None;
        if self.settings.pin_hash.is_some() {
            self.state = LockState::Unlocked;
        }
    }

    /// Re-enable the lock, reusing the existing PIN digest.
    ///
    /// # Errors
    /// - `Error::NotPermitted` if no PIN has ever been set; callers must run
    ///   [`SessionLock::setup_pin`] first
    pub fn enable(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.settings.pin_hash.is_none() {
            return Err(Error::NotPermitted(
                "No PIN configured; set one up first".to_string(),
            ));
        }
        self.settings.enabled = true;
        self.state = Self::gate_state(&self.settings, now);
        Ok(())
    }

    /// Replace the PIN, requiring the current one.
    ///
    /// Unlock-with-current followed by setup-of-new; there is no recovery
    /// path for a forgotten PIN.
    ///
    /// # Errors
    /// - `Error::NotPermitted` if no PIN is configured
    /// - `Error::InvalidPin` if `current` does not verify
    /// - `Error::Validation` if the new PIN is malformed or mismatched
    pub fn reset_pin(
        &mut self,
        current: &str,
        new_pin: &str,
        confirm: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.unlock(current, now)?;
        self.setup_pin(new_pin, confirm, now)
    }
}
