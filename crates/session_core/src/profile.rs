//! Customer profile types as seen by the core.
//!
//! Fuzzy matching lives entirely in the profile store; the core only deals
//! with the resulting candidate lists and fetched snapshots.

use serde::{Deserialize, Serialize};

/// One hit from a fuzzy name search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileCandidate {
    pub id: String,
    pub display_name: String,
}

/// Profile content cached onto the session at bind time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub id: String,
    pub display_name: String,
    /// Free-form portrait text (traits, priorities, current allocations).
    pub portrait: String,
}
