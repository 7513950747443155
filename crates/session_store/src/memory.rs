//! In-memory session store

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use session_core::Session;

use crate::store::{Result, SessionStore};

struct Entry {
    session: Session,
    expires_at: Instant,
}

/// In-memory store with per-entry deadlines. Expired entries are dropped
/// lazily on access, so callers observe the same idle behavior as a
/// deleted record.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn live_session(&self, owner: &str) -> Option<Session> {
        {
            let entries = self.entries.read().await;
            match entries.get(owner) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.session.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop the record so the owner reads as idle.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(owner) {
            if entry.expires_at <= Instant::now() {
                entries.remove(owner);
            }
        }
        None
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, owner: &str) -> Result<Option<Session>> {
        Ok(self.live_session(owner).await)
    }

    async fn put(&self, owner: &str, session: &Session, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            owner.to_string(),
            Entry {
                session: session.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, owner: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(owner);
        Ok(())
    }

    async fn exists(&self, owner: &str) -> Result<bool> {
        Ok(self.live_session(owner).await.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::ProfileSnapshot;

    fn session(owner: &str) -> Session {
        Session::bind(
            owner,
            &ProfileSnapshot {
                id: "p-1".to_string(),
                display_name: "Acme Corp".to_string(),
                portrait: "portrait".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemorySessionStore::new();
        assert!(store.get("u1").await.unwrap().is_none());

        store
            .put("u1", &session("u1"), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(store.exists("u1").await.unwrap());

        let loaded = store.get("u1").await.unwrap().unwrap();
        assert_eq!(loaded.owner, "u1");

        store.delete("u1").await.unwrap();
        assert!(!store.exists("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let store = MemorySessionStore::new();
        store
            .put("u1", &session("u1"), Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(store.get("u1").await.unwrap().is_none());
        assert!(!store.exists("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_resets_ttl() {
        let store = MemorySessionStore::new();
        store
            .put("u1", &session("u1"), Duration::from_millis(30))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Re-put before expiry extends the deadline.
        store
            .put("u1", &session("u1"), Duration::from_secs(60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(store.exists("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = MemorySessionStore::new();
        store
            .put("u1", &session("u1"), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(store.get("u2").await.unwrap().is_none());
        store.delete("u2").await.unwrap();
        assert!(store.exists("u1").await.unwrap());
    }
}
