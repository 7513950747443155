//! # Session Core
//!
//! Shared types for the customer-discussion assistant: the session record,
//! the error taxonomy, and the contracts for the external collaborators
//! (profile store, knowledge backend, summary writer).

pub mod collaborators;
pub mod error;
pub mod profile;
pub mod session;

// Re-exports
pub use collaborators::{
    BackendError, BackendResult, KnowledgeBackend, ProfileLookup, SummaryWriter,
};
pub use error::{Result, SessionError};
pub use profile::{ProfileCandidate, ProfileSnapshot};
pub use session::{Phase, Session, Speaker, Turn};
