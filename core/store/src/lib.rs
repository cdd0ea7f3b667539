//! Document store abstraction for WealthSense.
//!
//! This module provides a trait-based interface for the persistence
//! collaborator holding each user's tracking document, with in-memory and
//! local-filesystem implementations.
//!
//! # Design Principles
//! - Capability injection: callers receive a store, nothing resolves a global
//! - Opaque payloads: the store moves raw document bytes; sensitive fields
//!   arrive already encrypted and leave still encrypted
//! - Async operations: all I/O is async
//! - Unified error semantics: consistent error types across implementations

pub mod local;
pub mod memory;
pub mod store;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use store::DocumentStore;
