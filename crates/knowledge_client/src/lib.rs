//! # Knowledge Client
//!
//! REST client for the knowledge backend's two independent capabilities:
//! free-form generation conditioned on supplied context, and semantic
//! search over a named document corpus.

mod client;
mod protocol;

pub use client::KnowledgeClient;
