//! Session token store.
//!
//! Holds the single live [`Session`] for the process, mirrors it into a
//! [`SessionStorage`] so it survives restarts, and broadcasts sign-in/sign-out
//! transitions so views can redirect to the login screen without polling.
//!
//! The store is cheap to clone; every clone shares the same session.

mod storage;

pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::models::session::{AdminIdentity, Session};

/// Errors raised by session persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Reading or writing the backing medium failed.
    #[error("Session storage error: {0}")]
    Io(String),

    /// The session could not be serialized.
    #[error("Session encoding error: {0}")]
    Encode(String),
}

/// Whether a session is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// A token is held.
    SignedIn,
    /// No token; requests are refused locally.
    SignedOut,
}

/// Shared, persistent holder of the admin session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    storage: Box<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
    auth_tx: watch::Sender<AuthState>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.auth_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open a store backed by `storage`, restoring any persisted session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the storage cannot be read.
    pub fn open(storage: impl SessionStorage) -> Result<Self, SessionError> {
        let restored = storage.load()?;
        if let Some(session) = &restored {
            debug!(admin = %session.admin.email, "Restored persisted session");
        }
        Ok(Self::with_state(Box::new(storage), restored))
    }

    /// A store that keeps its session in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_state(Box::new(MemorySessionStorage::new()), None)
    }

    fn with_state(storage: Box<dyn SessionStorage>, current: Option<Session>) -> Self {
        let state = if current.is_some() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        };
        let (auth_tx, _) = watch::channel(state);

        Self {
            inner: Arc::new(SessionStoreInner {
                storage,
                current: RwLock::new(current),
                auth_tx,
            }),
        }
    }

    /// The current session, if any.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.read().clone()
    }

    /// The current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// The signed-in admin, if any.
    #[must_use]
    pub fn admin(&self) -> Option<AdminIdentity> {
        self.read().as_ref().map(|s| s.admin.clone())
    }

    /// Whether a session is held.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    /// Current sign-in state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.inner.auth_tx.borrow()
    }

    /// Watch sign-in/sign-out transitions.
    ///
    /// The receiver is only notified when the state actually changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.auth_tx.subscribe()
    }

    /// Replace the session with a freshly issued one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be persisted; the
    /// in-memory session is left unchanged in that case.
    #[instrument(skip(self, token), fields(admin = %admin.email))]
    pub fn set(&self, token: SecretString, admin: AdminIdentity) -> Result<(), SessionError> {
        let session = Session::new(token, admin);
        let mut current = self.write();
        self.inner.storage.save(&session)?;
        *current = Some(session);
        drop(current);

        info!("Session started");
        self.publish(AuthState::SignedIn);
        Ok(())
    }

    /// Drop the session unconditionally (explicit logout).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted copy cannot be erased. The
    /// in-memory session is cleared regardless.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut current = self.write();
        let had_session = current.take().is_some();
        let erased = self.inner.storage.erase();
        drop(current);

        if had_session {
            info!("Session cleared");
        }
        self.publish(AuthState::SignedOut);
        erased
    }

    /// Drop the session only if it still holds `token`.
    ///
    /// Used when the server rejects `token`: if another sign-in replaced it in
    /// the meantime, the newer session is kept. Returns whether a session was
    /// actually removed, so concurrent rejections of the same token clear it
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted copy cannot be erased. The
    /// in-memory session is cleared regardless.
    #[instrument(skip(self, token))]
    pub fn clear_if_current(&self, token: &SecretString) -> Result<bool, SessionError> {
        let mut current = self.write();
        if !current.as_ref().is_some_and(|s| s.holds(token)) {
            debug!("Rejected token is no longer current; keeping session");
            return Ok(false);
        }
        *current = None;
        let erased = self.inner.storage.erase();
        drop(current);

        info!("Session expired; signed out");
        self.publish(AuthState::SignedOut);
        erased.map(|()| true)
    }

    fn publish(&self, state: AuthState) {
        self.inner.auth_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use utpfund_core::AdminId;

    use super::*;

    fn admin(name: &str) -> AdminIdentity {
        AdminIdentity {
            id: AdminId::new(format!("id-{name}")),
            name: name.to_string(),
            email: format!("{name}@utpfund.live"),
            role: "admin".to_string(),
        }
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn load(&self) -> Result<Option<Session>, SessionError> {
            Ok(None)
        }

        fn save(&self, _session: &Session) -> Result<(), SessionError> {
            Err(SessionError::Io("disk full".to_string()))
        }

        fn erase(&self) -> Result<(), SessionError> {
            Err(SessionError::Io("read-only".to_string()))
        }
    }

    #[test]
    fn test_starts_signed_out() {
        let store = SessionStore::in_memory();
        assert!(store.get().is_none());
        assert!(store.token().is_none());
        assert_eq!(store.state(), AuthState::SignedOut);
    }

    #[test]
    fn test_set_then_get() {
        let store = SessionStore::in_memory();
        store.set(SecretString::from("t1"), admin("ops")).unwrap();

        assert_eq!(store.token().unwrap().expose_secret(), "t1");
        assert_eq!(store.admin().unwrap().name, "ops");
        assert_eq!(store.state(), AuthState::SignedIn);
    }

    #[test]
    fn test_clones_share_the_session() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set(SecretString::from("t1"), admin("ops")).unwrap();
        assert!(other.is_signed_in());
    }

    #[test]
    fn test_open_restores_persisted_session() {
        let storage = MemorySessionStorage::with_session(Session::new(
            SecretString::from("persisted"),
            admin("ops"),
        ));
        let store = SessionStore::open(storage).unwrap();
        assert_eq!(store.token().unwrap().expose_secret(), "persisted");
        assert_eq!(store.state(), AuthState::SignedIn);
    }

    #[test]
    fn test_clear_if_current_matches_token() {
        let store = SessionStore::in_memory();
        store.set(SecretString::from("t1"), admin("ops")).unwrap();

        assert!(!store.clear_if_current(&SecretString::from("other")).unwrap());
        assert!(store.is_signed_in());

        assert!(store.clear_if_current(&SecretString::from("t1")).unwrap());
        assert!(!store.is_signed_in());

        // Second rejection of the same token is a no-op
        assert!(!store.clear_if_current(&SecretString::from("t1")).unwrap());
    }

    #[test]
    fn test_newer_session_survives_stale_rejection() {
        let store = SessionStore::in_memory();
        store.set(SecretString::from("old"), admin("ops")).unwrap();
        store.set(SecretString::from("new"), admin("ops")).unwrap();

        assert!(!store.clear_if_current(&SecretString::from("old")).unwrap());
        assert_eq!(store.token().unwrap().expose_secret(), "new");
    }

    #[tokio::test]
    async fn test_subscribers_see_only_transitions() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();

        store.set(SecretString::from("t1"), admin("ops")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedIn);

        // Re-login while signed in is not a transition
        store.set(SecretString::from("t2"), admin("ops")).unwrap();
        assert!(!rx.has_changed().unwrap());

        store.clear_if_current(&SecretString::from("t2")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::SignedOut);

        store.clear().unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_failed_save_keeps_previous_session() {
        let store = SessionStore::open(FailingStorage).unwrap();
        let err = store.set(SecretString::from("t1"), admin("ops")).unwrap_err();
        assert_eq!(err, SessionError::Io("disk full".to_string()));
        assert!(!store.is_signed_in());
    }

    #[test]
    fn test_clear_drops_memory_even_if_erase_fails() {
        let store = SessionStore::with_state(
            Box::new(FailingStorage),
            Some(Session::new(SecretString::from("t1"), admin("ops"))),
        );
        assert!(store.clear().is_err());
        assert!(!store.is_signed_in());
        assert_eq!(store.state(), AuthState::SignedOut);
    }
}
