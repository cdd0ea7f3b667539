//! Tracking engine for WealthSense.
//!
//! This module provides:
//! - The PIN lock state machine gating the sensitive tracking view
//! - Record types for bank accounts, documents, payment methods and receipts
//! - The lifecycle manager that encrypts sensitive fields before they reach
//!   the document store and decrypts them transiently for display
//!
//! # Architecture
//! The tracking module sits between the user interface and the document
//! store, handling field encryption and lock bookkeeping transparently.
//! The store is injected as a capability; nothing here performs network I/O.

pub mod lock;
pub mod manager;
pub mod records;

pub use lock::{LockSettings, LockState, SessionLock, IDLE_TIMEOUT_MINUTES};
pub use manager::TrackingManager;
pub use records::{
    AccountType, BankAccount, Document, DocumentKind, NewBankAccount, NewDocument,
    NewPaymentMethod, NewReceipt, PaymentKind, PaymentMethod, Receipt, TrackingData,
};
