//! Session store trait and error type

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use session_core::Session;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value store for session records.
///
/// An owner with no record is idle; `get` on an expired record behaves
/// exactly as if the record had been deleted. Single-owner atomicity is
/// best-effort: callers re-read before every write and the last writer
/// wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the live session for an owner, if any.
    async fn get(&self, owner: &str) -> Result<Option<Session>>;

    /// Write the session, resetting its TTL.
    async fn put(&self, owner: &str, session: &Session, ttl: Duration) -> Result<()>;

    /// Remove the session. Removing an absent record is not an error.
    async fn delete(&self, owner: &str) -> Result<()>;

    /// Whether a live (non-expired) session exists for the owner.
    async fn exists(&self, owner: &str) -> Result<bool>;
}
