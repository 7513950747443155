//! File-backed session store
//!
//! One JSON envelope per owner under a base directory. Survives process
//! restarts; the TTL deadline is stored in the envelope and checked on
//! every read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use session_core::Session;

use crate::store::{Result, SessionStore};

#[derive(Serialize, Deserialize)]
struct Envelope {
    expires_at: DateTime<Utc>,
    session: Session,
}

/// File-based session store.
#[derive(Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, owner: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", owner))
    }

    async fn read_envelope(&self, owner: &str) -> Result<Option<Envelope>> {
        let path = self.session_path(owner);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).await?;
        let envelope: Envelope = serde_json::from_str(&contents)?;

        if envelope.expires_at <= Utc::now() {
            fs::remove_file(&path).await?;
            return Ok(None);
        }

        Ok(Some(envelope))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, owner: &str) -> Result<Option<Session>> {
        Ok(self.read_envelope(owner).await?.map(|e| e.session))
    }

    async fn put(&self, owner: &str, session: &Session, ttl: Duration) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        let envelope = Envelope {
            expires_at: Utc::now() + ttl,
            session: session.clone(),
        };

        let contents = serde_json::to_string_pretty(&envelope)?;
        fs::write(self.session_path(owner), contents).await?;

        Ok(())
    }

    async fn delete(&self, owner: &str) -> Result<()> {
        let path = self.session_path(owner);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn exists(&self, owner: &str) -> Result<bool> {
        Ok(self.read_envelope(owner).await?.is_some())
    }
}
