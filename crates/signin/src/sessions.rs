//! Session-keyed credential store for the host integration layer.
//!
//! The host framework re-runs the component on every render cycle, so the
//! credential for a logical user session must outlive each individual run.
//! The host owns one `SessionStore` and injects it wherever the component
//! executes; credentials are never ambient per-process state. Dropping a
//! session entry is the only way a credential goes away.

use std::collections::HashMap;
use std::sync::Arc;

use oauth::GoogleCredentials;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Maps session ids to their live credential.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<GoogleCredentials>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh session id for a newly connected user.
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Returns the session's credential, creating it with `init` on first
    /// sight of the id.
    pub async fn credentials_for(
        &self,
        session_id: &str,
        init: impl FnOnce() -> GoogleCredentials,
    ) -> Arc<Mutex<GoogleCredentials>> {
        if let Some(existing) = self.sessions.read().await.get(session_id) {
            return existing.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(%session_id, "creating credential for new session");
                Arc::new(Mutex::new(init()))
            })
            .clone()
    }

    /// Drops a session's credential. Returns whether the session existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() -> GoogleCredentials {
        GoogleCredentials::new("client-1", "secret-1")
    }

    #[tokio::test]
    async fn test_same_session_shares_one_credential() {
        let store = SessionStore::new();

        let first = store.credentials_for("sess-1", init).await;
        let second = store.credentials_for("sess-1", init).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();

        let a = store.credentials_for("sess-a", init).await;
        let b = store.credentials_for("sess-b", init).await;

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_session() {
        let store = SessionStore::new();
        store.credentials_for("sess-1", init).await;

        assert!(store.remove("sess-1").await);
        assert!(!store.remove("sess-1").await);
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionStore::new_session_id(), SessionStore::new_session_id());
    }
}
