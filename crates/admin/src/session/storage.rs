//! Durable backing for the session store.
//!
//! A session survives restarts by being written to a small JSON document with
//! two slots, [`keys::TOKEN`] and [`keys::ADMIN`]. Both slots are written and
//! erased together; a document with only one of them is treated as no session.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::SessionError;
use crate::models::session::{AdminIdentity, Session, keys};

/// Where a [`SessionStore`](super::SessionStore) persists its session.
pub trait SessionStorage: Send + Sync + 'static {
    /// Read the persisted session, if a complete one exists.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing medium cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Persist both slots of `session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing medium cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove both slots.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing medium cannot be written.
    fn erase(&self) -> Result<(), SessionError>;
}

/// On-disk shape of the session document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "adminToken", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(rename = "adminUser", default, skip_serializing_if = "Option::is_none")]
    admin: Option<AdminIdentity>,
}

impl StoredSession {
    fn from_session(session: &Session) -> Self {
        Self {
            token: Some(session.token.expose_secret().to_string()),
            admin: Some(session.admin.clone()),
        }
    }

    fn into_session(self) -> Option<Session> {
        match (self.token, self.admin) {
            (Some(token), Some(admin)) if !token.is_empty() => {
                Some(Session::new(SecretString::from(token), admin))
            }
            (None, None) => None,
            _ => {
                warn!(
                    token_slot = keys::TOKEN,
                    admin_slot = keys::ADMIN,
                    "Ignoring partially persisted session"
                );
                None
            }
        }
    }
}

/// Session document stored in a file, normally under the user's config dir.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Storage at `path`. Nothing is touched until the first read or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: &std::io::Error) -> SessionError {
        SessionError::Io(format!("{}: {e}", self.path.display()))
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(&e)),
        };

        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(stored) => Ok(stored.into_session()),
            Err(e) => {
                // An unreadable document is not a usable session
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
        }

        let body = serde_json::to_vec_pretty(&StoredSession::from_session(session))
            .map_err(|e| SessionError::Encode(e.to_string()))?;

        // Write-then-rename so a crash never leaves one slot behind
        let staging = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&staging).map_err(|e| self.io_error(&e))?;
            file.write_all(&body).map_err(|e| self.io_error(&e))?;
            file.sync_all().map_err(|e| self.io_error(&e))?;
        }
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(&e))?;

        debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    fn erase(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(&e)),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

/// Process-local storage. Sessions vanish when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn erase(&self) -> Result<(), SessionError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}
