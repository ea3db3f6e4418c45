//! Persisted session storage.
//!
//! DESIGN
//! ======
//! The session survives restarts as a single namespaced JSON document,
//! `{"state": {...}, "version": 0}`, written whole on every login,
//! register and logout. [`MemoryStorage`] stands in for the file when a
//! caller (or a test) wants an isolated, non-durable session.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::types::Session;

/// Storage key for the persisted session.
pub const SESSION_NAMESPACE: &str = "auth-storage";

const STORAGE_VERSION: u32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("session storage unavailable")]
    Unavailable,
}

/// Backing store for the serialized [`Session`].
pub trait SessionStorage: Send + Sync {
    /// Load the persisted session. `Ok(None)` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the entry exists but cannot be read.
    fn load(&self) -> Result<Option<Session>, StorageError>;

    /// Overwrite the persisted session.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the entry cannot be written.
    fn save(&self, session: &Session) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: Session,
    #[serde(default)]
    version: u32,
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// Session persisted as `<dir>/auth-storage.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(format!("{SESSION_NAMESPACE}.json")) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_str(&raw)?;
        Ok(Some(envelope.state))
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let envelope = Envelope { state: session.clone(), version: STORAGE_VERSION };
        let encoded = serde_json::to_string_pretty(&envelope)?;

        // Readers only ever see a complete document.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, encoded)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), authenticated = session.authenticated, "session persisted");
        Ok(())
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// In-process storage. Writes can be switched off to exercise failure paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    session: Mutex<Option<Session>>,
    reject_writes: AtomicBool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `session`, as if saved by an earlier run.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self { session: Mutex::new(Some(session)), reject_writes: AtomicBool::new(false) }
    }

    /// Make subsequent `save` calls fail with [`StorageError::Unavailable`].
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// The last saved session, if any.
    #[must_use]
    pub fn stored(&self) -> Option<Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.stored())
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable);
        }
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
