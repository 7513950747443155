//! # Session Engine
//!
//! The session lifecycle state machine. Validates command legality against
//! the persisted phase tag, assembles generation context, orchestrates the
//! collaborators, and persists the session only after every collaborator
//! call for a command has succeeded.

pub mod context;
pub mod engine;

// Re-exports
pub use engine::{EngineConfig, EngineReply, SessionEngine};
