//! Session snapshot and the shared handle that every component reads.
//!
//! The router guard, the session store and the session invalidation handler
//! all hold clones of one [`SessionState`]. Writers take a short lock and
//! never hold it across an await point.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Deserialize;
use tracing::warn;

use super::ports::{DurableStorage, TOKEN_KEY, USER_INFO_KEY};
use super::{Role, UserProfile};

/// Token and profile of the current user.
///
/// ## Invariants
/// - Logged-in status is derived from the token and never stored.
/// - Clearing the session clears token and profile together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    token: String,
    profile: Option<UserProfile>,
}

impl Session {
    /// Build a session from a token and optional profile.
    pub fn new(token: impl Into<String>, profile: Option<UserProfile>) -> Self {
        Self {
            token: token.into(),
            profile,
        }
    }

    /// Bearer token; empty when signed out.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Cached profile, if one has been loaded.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Whether a non-empty token is held.
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    /// Role from the cached profile; `None` without a profile.
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|profile| profile.role)
    }
}

/// Payload returned by `/login` and `/login_code`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginGrant {
    /// Bearer token for later requests.
    pub token: String,
    /// Profile of the account that signed in.
    #[serde(default)]
    pub user_info: UserProfile,
}

/// Shared, cloneable handle to the current [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<Session>>,
}

impl SessionState {
    /// Wrap an initial session.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Rebuild the session from durable storage.
    ///
    /// Unreadable storage or a malformed stored profile is logged and treated
    /// as absent.
    pub fn hydrate(storage: &dyn DurableStorage) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.unwrap_or_default(),
            Err(error) => {
                warn!(%error, "failed to read stored token");
                String::new()
            }
        };
        let profile = match storage.get(USER_INFO_KEY) {
            Ok(Some(raw)) => decode_stored_profile(&raw),
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "failed to read stored profile");
                None
            }
        };
        Self::new(Session::new(token, profile))
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Whether a non-empty token is held.
    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    /// Role from the cached profile; `None` without a profile.
    pub fn role(&self) -> Option<Role> {
        self.read().role()
    }

    /// Replace token and profile together.
    pub fn replace(&self, token: String, profile: UserProfile) {
        *self.write() = Session::new(token, Some(profile));
    }

    /// Replace the profile, keeping the token.
    pub fn set_profile(&self, profile: UserProfile) {
        self.write().profile = Some(profile);
    }

    /// Clear token and profile in memory.
    pub fn clear(&self) {
        *self.write() = Session::default();
    }

    /// Clear the session in memory and remove both durable keys.
    ///
    /// Storage failures are logged; memory is always cleared.
    pub fn discard(&self, storage: &dyn DurableStorage) {
        self.clear();
        for key in [TOKEN_KEY, USER_INFO_KEY] {
            if let Err(error) = storage.remove(key) {
                warn!(%error, key, "failed to remove stored session entry");
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode_stored_profile(raw: &str) -> Option<UserProfile> {
    // `{}` is the placeholder for "no profile".
    match serde_json::from_str::<UserProfile>(raw) {
        Ok(profile) if raw.trim() != "{}" => Some(profile),
        Ok(_) => None,
        Err(error) => {
            warn!(%error, "ignoring malformed stored profile");
            None
        }
    }
}
