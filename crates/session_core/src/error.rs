//! Session error taxonomy

use thiserror::Error;

use crate::profile::ProfileCandidate;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no profile matched the query")]
    ProfileNotFound,

    #[error("{} profiles matched, please be more specific", .0.len())]
    AmbiguousProfile(Vec<ProfileCandidate>),

    #[error("no active session")]
    NoActiveSession,

    #[error("a session is already active, end or cancel it first")]
    SessionAlreadyActive,

    #[error("no summary is pending confirmation")]
    NoPendingSummary,

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
