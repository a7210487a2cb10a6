//! Client-local auth state.
//!
//! The bearer token, username and display name are the only things the client
//! persists. [`SessionHandle`] is the single in-memory source of truth that the
//! HTTP client reads on every request; a [`SessionStore`] keeps it across
//! launches.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub name: String,
}

impl Session {
    /// Builds a session from a login response. The display name falls back to the username.
    pub fn new(token: String, username: Option<String>, name: Option<String>) -> Self {
        let username = username.unwrap_or_default();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| username.clone());
        Self {
            token,
            username,
            name,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Greeting name for the home view.
    pub fn display_name(&self) -> String {
        self.read()
            .as_ref()
            .map(|s| s.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "User".to_string())
    }

    pub fn set(&self, session: Session) {
        *self.write() = Some(session);
    }

    pub fn clear(&self) {
        *self.write() = None;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_falls_back_to_username() {
        let session = Session::new("t".into(), Some("alice".into()), None);
        assert_eq!(session.name, "alice");

        let blank = Session::new("t".into(), Some("bob".into()), Some(" ".into()));
        assert_eq!(blank.name, "bob");
    }

    #[test]
    fn test_handle_is_shared_between_clones() {
        let handle = SessionHandle::default();
        let other = handle.clone();
        assert!(!other.is_authenticated());
        assert_eq!(other.display_name(), "User");

        handle.set(Session::new("abc".into(), Some("alice".into()), Some("Alice".into())));
        assert_eq!(other.token().as_deref(), Some("abc"));
        assert_eq!(other.display_name(), "Alice");

        other.clear();
        assert!(handle.token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token".into(), Some("alice".into()), None);
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("alice"));
    }
}
