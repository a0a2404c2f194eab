use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::models::{TokenPair, User};
use crate::storage::{Storage, StoreResult};

use super::session::{Credential, Session};

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Storage key for the JSON-serialized user
pub const USER_KEY: &str = "user";

/// Owner of the current session.
///
/// In-memory state sits behind a lock that is held across the storage
/// write-through, so a reader sees either the old or the new session and
/// never a mix of the two.
pub struct TokenStore {
    storage: Arc<dyn Storage>,
    state: RwLock<Option<Session>>,
}

impl TokenStore {
    /// Create an empty (signed-out) store over `storage`. Call `load` to
    /// restore a persisted session.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            state: RwLock::new(None),
        }
    }

    /// Create a store and immediately restore any persisted session
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let store = Self::new(storage);
        store.load();
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Restore the session from storage.
    ///
    /// All three entries must be present and the user must parse, otherwise
    /// the store is left signed out. Returns whether a session was restored.
    pub fn load(&self) -> bool {
        let mut state = self.write();
        *state = self.read_persisted();
        let restored = state.is_some();
        debug!(restored, "Token store loaded");
        restored
    }

    fn read_persisted(&self) -> Option<Session> {
        let get = |key: &str| match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted session entry");
                None
            }
        };

        let access_token = get(ACCESS_TOKEN_KEY)?;
        let refresh_token = get(REFRESH_TOKEN_KEY)?;
        let user_json = get(USER_KEY)?;

        let user: User = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Persisted user is malformed, ignoring session");
                return None;
            }
        };

        Some(Session::new(
            user,
            Credential {
                access_token,
                refresh_token,
            },
        ))
    }

    /// Replace the session and persist all three entries
    pub fn set(&self, session: Session) -> StoreResult<()> {
        let mut state = self.write();
        let user_json = serde_json::to_string(&session.user)?;
        let result = self.persist(&session.credential, Some(&user_json));
        info!(user_id = session.user.id, "Session stored");
        *state = Some(session);
        result
    }

    /// Swap in a refreshed token pair, keeping the current user.
    ///
    /// Returns `false` without touching storage when there is no session,
    /// e.g. the user signed out while the refresh was in flight.
    pub fn set_tokens(&self, pair: TokenPair) -> StoreResult<bool> {
        let mut state = self.write();
        let Some(session) = state.as_mut() else {
            debug!("Ignoring refreshed tokens: no active session");
            return Ok(false);
        };
        session.credential = pair.into();
        self.persist(&session.credential, None)?;
        debug!("Session tokens rotated");
        Ok(true)
    }

    /// Replace the stored user, keeping the credential
    pub fn update_user(&self, user: User) -> StoreResult<bool> {
        let mut state = self.write();
        let Some(session) = state.as_mut() else {
            return Ok(false);
        };
        let user_json = serde_json::to_string(&user)?;
        self.storage.set(USER_KEY, &user_json)?;
        session.user = user;
        Ok(true)
    }

    fn persist(&self, credential: &Credential, user_json: Option<&str>) -> StoreResult<()> {
        self.storage.set(ACCESS_TOKEN_KEY, &credential.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &credential.refresh_token)?;
        if let Some(user_json) = user_json {
            self.storage.set(USER_KEY, user_json)?;
        }
        Ok(())
    }

    /// Drop the session and delete every persisted entry.
    ///
    /// All three removals are attempted even if one fails; the first error
    /// is returned.
    pub fn clear(&self) -> StoreResult<()> {
        let mut state = self.write();
        *state = None;
        let mut first_err = None;
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove persisted session entry");
                first_err.get_or_insert(e);
            }
        }
        info!("Session cleared");
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Current access token, if signed in
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .map(|s| s.credential.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    /// Current refresh token, if signed in
    pub fn refresh_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .map(|s| s.credential.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.read().as_ref().map(|s| s.user.id)
    }

    /// Snapshot of the whole session
    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}
