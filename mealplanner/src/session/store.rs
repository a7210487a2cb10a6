use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::Session;
use crate::error::{PlannerError, Result};

/// Persistent key-value storage for the session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>>;
    async fn save(&self, session: &Session) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// JSON file on disk. Parent directories are created on first save.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let session = serde_json::from_slice(&bytes).map_err(|e| {
                    PlannerError::Session(format!(
                        "Corrupt session file {}: {e}",
                        self.path.display()
                    ))
                })?;
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, bytes).await?;
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
