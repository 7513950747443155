//! Full discussion lifecycle: bind, query, end, save.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use session_core::{
    BackendError, BackendResult, KnowledgeBackend, ProfileCandidate, ProfileLookup,
    ProfileSnapshot, SessionError, SummaryWriter,
};
use session_engine::{EngineConfig, EngineReply, SessionEngine};
use session_store::MemorySessionStore;

struct Directory;

#[async_trait]
impl ProfileLookup for Directory {
    async fn search_profiles(&self, query: &str) -> BackendResult<Vec<ProfileCandidate>> {
        // Title-contains matching, as the profile store does server-side.
        let all = [("p-acme", "Acme Corp"), ("p-globex", "Globex")];
        Ok(all
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&query.to_lowercase()))
            .map(|(id, name)| ProfileCandidate {
                id: id.to_string(),
                display_name: name.to_string(),
            })
            .collect())
    }

    async fn fetch_profile(&self, id: &str) -> BackendResult<ProfileSnapshot> {
        if id != "p-acme" {
            return Err(BackendError::Api(format!("unknown profile {}", id)));
        }
        Ok(ProfileSnapshot {
            id: id.to_string(),
            display_name: "Acme Corp".to_string(),
            portrait: "Mid-size manufacturer, conservative budget.".to_string(),
        })
    }
}

struct EchoBackend;

#[async_trait]
impl KnowledgeBackend for EchoBackend {
    async fn generate(&self, context: &str, instruction: &str) -> BackendResult<String> {
        // Echo enough of the inputs that assertions can see what was sent.
        if instruction.contains("bullet-point recap") {
            Ok(format!("summary of: {}", context))
        } else {
            Ok(format!("answer to: {}", instruction))
        }
    }

    async fn search(&self, corpus: &str, query: &str) -> BackendResult<String> {
        Ok(format!("[{}] results for: {}", corpus, query))
    }
}

#[derive(Default)]
struct RecordingWriter {
    writes: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SummaryWriter for RecordingWriter {
    async fn write_summary(&self, profile_id: &str, summary: &str) -> BackendResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((profile_id.to_string(), summary.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn full_discussion_lifecycle() {
    let writer = Arc::new(RecordingWriter::default());
    let engine = SessionEngine::new(
        MemorySessionStore::new(),
        Arc::new(Directory),
        Arc::new(EchoBackend),
        writer.clone(),
        EngineConfig::default(),
    );

    // Bind to the single profile matching "Acme".
    let reply = engine.bind("team-7", "Acme", None).await.unwrap();
    assert_eq!(
        reply,
        EngineReply::Bound {
            profile_name: "Acme Corp".to_string()
        }
    );

    // Ask about the budget; the exchange lands in the transcript.
    let answer = match engine.query("team-7", "what's their budget?").await.unwrap() {
        EngineReply::Answer(answer) => answer,
        other => panic!("expected answer, got {:?}", other),
    };
    assert!(answer.contains("what's their budget?"));

    // End the discussion; the draft summary covers the budget exchange.
    let draft = match engine.end_session("team-7").await.unwrap() {
        EngineReply::DraftSummary(draft) => draft,
        other => panic!("expected draft, got {:?}", other),
    };
    assert!(draft.contains("what's their budget?"));

    // Save: one write with the final draft, then the session is gone.
    let reply = engine.save("team-7").await.unwrap();
    assert_eq!(
        reply,
        EngineReply::Saved {
            profile_name: "Acme Corp".to_string()
        }
    );

    let writes = writer.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "p-acme");
    assert_eq!(writes[0].1, draft);
    drop(writes);

    assert!(matches!(
        engine.query("team-7", "anything else?").await,
        Err(SessionError::NoActiveSession)
    ));
}

#[tokio::test]
async fn ambiguous_bind_lists_both_matches() {
    let engine = SessionEngine::new(
        MemorySessionStore::new(),
        Arc::new(Directory),
        Arc::new(EchoBackend),
        Arc::new(RecordingWriter::default()),
        EngineConfig::default(),
    );

    // "o" appears in both "Acme Corp" and "Globex".
    match engine.bind("team-7", "o", None).await {
        Err(SessionError::AmbiguousProfile(candidates)) => {
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected AmbiguousProfile, got {:?}", other.map(|_| ())),
    }
}
