//! Session state machine
//!
//! Each command is a read-modify-write against the store: read the current
//! record, validate legality against the phase tag, call collaborators,
//! then persist. Validation failures are returned before any collaborator
//! call; collaborator failures abort with no session mutation; the TTL is
//! refreshed on every successful command.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use session_core::{
    BackendResult, KnowledgeBackend, Phase, ProfileLookup, Result, Session, SessionError,
    SummaryWriter, Turn,
};
use session_store::SessionStore;

use crate::context;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Store TTL, refreshed on every successful command.
    pub session_ttl: Duration,
    /// Upper bound on any single collaborator call.
    pub call_timeout: Duration,
    /// Corpus name for product searches.
    pub product_corpus: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Seven days, so abandoned discussions eventually read as idle.
            session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            call_timeout: Duration::from_secs(30),
            product_corpus: "products".to_string(),
        }
    }
}

/// What a successful command should present to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    /// Session bound without a question; no generation call was made.
    Bound { profile_name: String },
    /// Generated answer to a question.
    Answer(String),
    /// Product search result; never recorded in the transcript.
    SearchResult(String),
    /// Draft summary awaiting confirmation (fresh or revised).
    DraftSummary(String),
    /// Summary written to the profile and session closed.
    Saved { profile_name: String },
    /// Session discarded. `had_session` is false for the idle no-op case.
    Cancelled { had_session: bool },
    /// Free-form discussion note appended to the transcript.
    NoteRecorded,
    /// Free text received while idle; dropped without effect.
    Ignored,
}

/// The session lifecycle state machine.
///
/// Holds no per-owner state in memory; the store is the single source of
/// truth, so concurrent commands for different owners never contend on an
/// in-process lock. Same-owner races resolve last-writer-wins.
pub struct SessionEngine<S: SessionStore> {
    store: Arc<S>,
    profiles: Arc<dyn ProfileLookup>,
    knowledge: Arc<dyn KnowledgeBackend>,
    writer: Arc<dyn SummaryWriter>,
    config: EngineConfig,
}

impl<S: SessionStore> SessionEngine<S> {
    pub fn new(
        store: S,
        profiles: Arc<dyn ProfileLookup>,
        knowledge: Arc<dyn KnowledgeBackend>,
        writer: Arc<dyn SummaryWriter>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            profiles,
            knowledge,
            writer,
            config,
        }
    }

    /// Bind a session to the profile matching `profile_query`.
    ///
    /// Zero matches fail with `ProfileNotFound`, more than one with
    /// `AmbiguousProfile` carrying the candidates; the engine never guesses.
    /// With a question, one generation call is made and both sides of the
    /// exchange are recorded; without one, no backend call happens at all.
    pub async fn bind(
        &self,
        owner: &str,
        profile_query: &str,
        question: Option<&str>,
    ) -> Result<EngineReply> {
        if self.load(owner).await?.is_some() {
            return Err(SessionError::SessionAlreadyActive);
        }

        let candidates = self
            .call(self.profiles.search_profiles(profile_query))
            .await?;
        let candidate = match candidates.len() {
            0 => return Err(SessionError::ProfileNotFound),
            1 => &candidates[0],
            _ => return Err(SessionError::AmbiguousProfile(candidates)),
        };

        let profile = self.call(self.profiles.fetch_profile(&candidate.id)).await?;
        let mut session = Session::bind(owner, &profile);
        log::info!(
            "bound session for owner {} to profile {} ({})",
            owner,
            profile.id,
            profile.display_name
        );

        match question {
            Some(question) => {
                let answer = self.answer_into(&mut session, question).await?;
                self.persist(&mut session).await?;
                Ok(EngineReply::Answer(answer))
            }
            None => {
                self.persist(&mut session).await?;
                Ok(EngineReply::Bound {
                    profile_name: session.profile_name,
                })
            }
        }
    }

    /// Answer a question in the context of the active discussion.
    pub async fn query(&self, owner: &str, question: &str) -> Result<EngineReply> {
        let mut session = self.load_active(owner).await?;
        let answer = self.answer_into(&mut session, question).await?;
        self.persist(&mut session).await?;
        Ok(EngineReply::Answer(answer))
    }

    /// Search the product corpus, grounded in the discussion so far.
    ///
    /// The result is returned directly and never appended to the
    /// transcript, keeping the history focused on dialogue.
    pub async fn search_products(&self, owner: &str, question: &str) -> Result<EngineReply> {
        let mut session = self.load_active(owner).await?;
        let query = context::search_query(&session.turns, question);
        let result = self
            .call(self.knowledge.search(&self.config.product_corpus, &query))
            .await?;
        self.persist(&mut session).await?;
        Ok(EngineReply::SearchResult(result))
    }

    /// Product search without any session; pure passthrough.
    pub async fn search_products_standalone(&self, question: &str) -> Result<EngineReply> {
        let result = self
            .call(self.knowledge.search(&self.config.product_corpus, question))
            .await?;
        Ok(EngineReply::SearchResult(result))
    }

    /// Summarize the discussion and move to the save-confirmation phase.
    pub async fn end_session(&self, owner: &str) -> Result<EngineReply> {
        let mut session = self.load_active(owner).await?;
        let request = context::summary_request(
            &session.profile_name,
            &session.profile_snapshot,
            &session.turns,
        );
        let draft = self
            .call(self.knowledge.generate(&request.context, &request.instruction))
            .await?;

        session.begin_save_review(draft.clone());
        self.persist(&mut session).await?;
        Ok(EngineReply::DraftSummary(draft))
    }

    /// Revise the pending draft in place; the phase and transcript are
    /// untouched.
    pub async fn revise_summary(&self, owner: &str, instruction: &str) -> Result<EngineReply> {
        let mut session = self.load_pending(owner).await?;
        let revised = self.revise_into(&mut session, instruction).await?;
        self.persist(&mut session).await?;
        Ok(EngineReply::DraftSummary(revised))
    }

    /// Write the confirmed draft to the profile and close the session.
    ///
    /// The session record is deleted only after the writer reports
    /// success; on writer failure the record is left intact so the caller
    /// can retry.
    pub async fn save(&self, owner: &str) -> Result<EngineReply> {
        let session = self.load_pending(owner).await?;
        let draft = match session.draft() {
            Some(draft) => draft,
            None => return Err(SessionError::NoPendingSummary),
        };

        match tokio::time::timeout(
            self.config.call_timeout,
            self.writer.write_summary(&session.profile_ref, draft),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!("summary write failed for owner {}: {}", owner, e);
                return Err(SessionError::PersistenceFailure(e.to_string()));
            }
            Err(_) => {
                return Err(SessionError::PersistenceFailure(
                    "summary write timed out".to_string(),
                ))
            }
        }

        self.store
            .delete(owner)
            .await
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
        log::info!(
            "saved summary for owner {} to profile {}",
            owner,
            session.profile_ref
        );
        Ok(EngineReply::Saved {
            profile_name: session.profile_name,
        })
    }

    /// Discard the session, whatever its phase. Idempotent: cancelling
    /// while idle is a no-op success.
    pub async fn cancel(&self, owner: &str) -> Result<EngineReply> {
        let had_session = self.load(owner).await?.is_some();
        self.store
            .delete(owner)
            .await
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
        Ok(EngineReply::Cancelled { had_session })
    }

    /// Record a free-form team remark in the transcript of an active
    /// discussion. No collaborator call is made.
    pub async fn note(&self, owner: &str, author: &str, text: &str) -> Result<EngineReply> {
        let mut session = self.load_active(owner).await?;
        session.push_turn(Turn::user(format!("{}: {}", author, text)));
        self.persist(&mut session).await?;
        Ok(EngineReply::NoteRecorded)
    }

    /// Route free-form text strictly on the persisted phase tag: idle
    /// owners' messages are ignored, active discussions record a note, and
    /// a pending draft treats the text as a revision instruction.
    pub async fn dispatch_free_text(
        &self,
        owner: &str,
        author: &str,
        text: &str,
    ) -> Result<EngineReply> {
        let session = match self.load(owner).await? {
            Some(session) => session,
            None => return Ok(EngineReply::Ignored),
        };

        match session.phase {
            Phase::Active => self.note(owner, author, text).await,
            Phase::AwaitingSave { .. } => self.revise_summary(owner, text).await,
        }
    }

    // ---------- internals ----------

    /// Generate an answer and record the exchange on the session. The
    /// session is not persisted here; callers persist after all calls
    /// succeed.
    async fn answer_into(&self, session: &mut Session, question: &str) -> Result<String> {
        let request = context::answer_request(
            &session.profile_name,
            &session.profile_snapshot,
            &session.turns,
            question,
        );
        let answer = self
            .call(self.knowledge.generate(&request.context, &request.instruction))
            .await?;

        session.push_turn(Turn::user(question));
        session.push_turn(Turn::assistant(answer.clone()));
        Ok(answer)
    }

    /// Generate a revised draft and swap it onto the session.
    async fn revise_into(&self, session: &mut Session, instruction: &str) -> Result<String> {
        let draft = match session.draft() {
            Some(draft) => draft.to_string(),
            None => return Err(SessionError::NoPendingSummary),
        };
        let request = context::revision_request(&draft, instruction);
        let revised = self
            .call(self.knowledge.generate(&request.context, &request.instruction))
            .await?;
        session.replace_draft(revised.clone());
        Ok(revised)
    }

    async fn load(&self, owner: &str) -> Result<Option<Session>> {
        self.store
            .get(owner)
            .await
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))
    }

    /// Load the owner's session, requiring the active phase.
    async fn load_active(&self, owner: &str) -> Result<Session> {
        match self.load(owner).await? {
            Some(session) if session.is_active() => Ok(session),
            _ => Err(SessionError::NoActiveSession),
        }
    }

    /// Load the owner's session, requiring a pending draft.
    async fn load_pending(&self, owner: &str) -> Result<Session> {
        match self.load(owner).await? {
            Some(session) if session.draft().is_some() => Ok(session),
            _ => Err(SessionError::NoPendingSummary),
        }
    }

    /// Touch and write the session, refreshing its TTL.
    async fn persist(&self, session: &mut Session) -> Result<()> {
        session.touch();
        self.store
            .put(&session.owner, session, self.config.session_ttl)
            .await
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))
    }

    /// Bound a collaborator call by the configured timeout. Neither a
    /// timeout nor a backend error mutates the session.
    async fn call<T>(&self, fut: impl Future<Output = BackendResult<T>>) -> Result<T> {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SessionError::BackendUnavailable(e.to_string())),
            Err(_) => Err(SessionError::BackendUnavailable(
                "call timed out".to_string(),
            )),
        }
    }
}
