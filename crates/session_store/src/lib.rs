//! # Session Store
//!
//! Key-value persistence for session records, keyed by owner identity,
//! with a time-to-live so abandoned sessions expire like a cancel.

pub mod file;
pub mod memory;
pub mod store;

// Re-exports
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use store::{SessionStore, StoreError};
