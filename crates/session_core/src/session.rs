//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::ProfileSnapshot;

/// Who produced a turn in the transcript.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One (speaker, text) exchange recorded in a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Lifecycle phase of a live session.
///
/// Idle has no variant here: an idle owner simply has no record in the
/// store. The draft summary exists exactly when the session is awaiting
/// save confirmation, so it lives on that variant rather than as a
/// separate optional field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Active,
    AwaitingSave { draft: String },
}

/// Live state of one owner's customer discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Owner identity, the partition key in the store.
    pub owner: String,

    /// Current lifecycle phase.
    pub phase: Phase,

    /// Bound profile id; set once at bind and immutable afterwards.
    pub profile_ref: String,

    /// Display name cached at bind time.
    pub profile_name: String,

    /// Portrait text cached at bind time; not re-fetched for the
    /// session's lifetime.
    pub profile_snapshot: String,

    /// Ordered transcript; append-only while the session is active.
    pub turns: Vec<Turn>,

    pub created_at: DateTime<Utc>,

    /// The store enforces TTL expiry from this timestamp.
    pub last_touched_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh active session bound to the given profile.
    pub fn bind(owner: impl Into<String>, profile: &ProfileSnapshot) -> Self {
        let now = Utc::now();
        Self {
            owner: owner.into(),
            phase: Phase::Active,
            profile_ref: profile.id.clone(),
            profile_name: profile.display_name.clone(),
            profile_snapshot: profile.portrait.clone(),
            turns: Vec::new(),
            created_at: now,
            last_touched_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active)
    }

    /// The pending draft summary, if the session is awaiting confirmation.
    pub fn draft(&self) -> Option<&str> {
        match &self.phase {
            Phase::AwaitingSave { draft } => Some(draft),
            Phase::Active => None,
        }
    }

    /// Append a turn to the transcript.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.touch();
    }

    /// Move into the save-confirmation phase with a freshly generated draft.
    pub fn begin_save_review(&mut self, draft: String) {
        self.phase = Phase::AwaitingSave { draft };
        self.touch();
    }

    /// Replace the pending draft with a revised one. Returns false if the
    /// session is not awaiting confirmation.
    pub fn replace_draft(&mut self, revised: String) -> bool {
        match &mut self.phase {
            Phase::AwaitingSave { draft } => {
                *draft = revised;
                self.touch();
                true
            }
            Phase::Active => false,
        }
    }

    /// Refresh the TTL anchor.
    pub fn touch(&mut self) {
        self.last_touched_at = Utc::now();
    }
}
