//! Contracts for the external collaborators.
//!
//! The engine only sees these traits; concrete HTTP clients live in their
//! own crates and tests substitute in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::profile::{ProfileCandidate, ProfileSnapshot};

/// Failure of a collaborator call. Kept transport-agnostic so this crate
/// stays free of HTTP dependencies; clients map their errors in.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Fuzzy customer lookup against the profile store.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Fuzzy name search; returns zero or more candidates.
    async fn search_profiles(&self, query: &str) -> BackendResult<Vec<ProfileCandidate>>;

    /// Fetch the full snapshot for a known profile id.
    async fn fetch_profile(&self, id: &str) -> BackendResult<ProfileSnapshot>;
}

/// Semantic search plus free-form generation.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    /// Generate text conditioned on the supplied context and instruction.
    async fn generate(&self, context: &str, instruction: &str) -> BackendResult<String>;

    /// Semantic search scoped to a named corpus, returning a grounded
    /// answer string.
    async fn search(&self, corpus: &str, query: &str) -> BackendResult<String>;
}

/// Writes a confirmed discussion summary back onto a profile page.
#[async_trait]
pub trait SummaryWriter: Send + Sync {
    async fn write_summary(&self, profile_id: &str, summary: &str) -> BackendResult<()>;
}
