//! # Profile Client
//!
//! REST client for the customer profile store. Fuzzy name matching happens
//! server-side; this crate only ships queries and decodes candidate lists,
//! portrait snapshots, and summary-block writes.

mod client;
mod models;

pub use client::ProfileStoreClient;
