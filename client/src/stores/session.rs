//! Session store: sign-in, sign-out and profile refresh.
//!
//! Writes happen strictly after the backend call resolves. Durable storage is
//! updated before memory; a failed write rolls storage back and leaves memory
//! untouched.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{AuthApi, RegisterReceipt};
use crate::domain::ports::{
    ApiTransportError, DurableStorage, StorageError, TOKEN_KEY, USER_INFO_KEY,
};
use crate::domain::{
    CodeCredentials, LoginGrant, PasswordCredentials, Registration, Session, SessionState,
    UserProfile,
};

/// Errors returned by session operations that propagate failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiTransportError),
    /// The session could not be persisted; durable state was rolled back.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The profile could not be encoded for storage.
    #[error("failed to encode profile: {message}")]
    Encode { message: String },
}

/// Owns session transitions and keeps memory and durable storage aligned.
#[derive(Clone)]
pub struct SessionStore {
    auth: AuthApi,
    storage: Arc<dyn DurableStorage>,
    state: SessionState,
}

impl SessionStore {
    /// Store over `state`, persisting through `storage`.
    pub fn new(auth: AuthApi, storage: Arc<dyn DurableStorage>, state: SessionState) -> Self {
        Self {
            auth,
            storage,
            state,
        }
    }

    /// Shared session handle observed by the router.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.snapshot()
    }

    /// Sign in with mobile and password.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] when the backend rejects the call and
    /// [`SessionError::Storage`] when the grant cannot be persisted. The
    /// previous session is untouched in both cases.
    pub async fn login(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<LoginGrant, SessionError> {
        let grant = self.auth.login(credentials).await?;
        self.commit(&grant)?;
        debug!(user_id = grant.user_info.id, "signed in with password");
        Ok(grant)
    }

    /// Sign in with mobile and SMS code. Same contract as [`Self::login`].
    ///
    /// # Errors
    ///
    /// See [`Self::login`].
    pub async fn login_by_code(
        &self,
        credentials: &CodeCredentials,
    ) -> Result<LoginGrant, SessionError> {
        let grant = self.auth.login_by_code(credentials).await?;
        self.commit(&grant)?;
        debug!(user_id = grant.user_info.id, "signed in with verification code");
        Ok(grant)
    }

    /// Create an account. The session is not changed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] when the backend rejects the call.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegisterReceipt, SessionError> {
        Ok(self.auth.register(registration).await?)
    }

    /// Refresh the cached profile. Failures keep the stale profile.
    pub async fn fetch_profile(&self) {
        let profile = match self.auth.profile().await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(%error, "failed to refresh profile");
                return;
            }
        };
        match encode_profile(&profile) {
            Ok(encoded) => {
                if let Err(error) = self.storage.set(USER_INFO_KEY, &encoded) {
                    warn!(%error, "failed to persist refreshed profile");
                }
            }
            Err(error) => warn!(%error, "failed to encode refreshed profile"),
        }
        self.state.set_profile(profile);
    }

    /// Sign out. Local state is always cleared, whatever the backend says.
    pub async fn logout(&self) {
        if let Err(error) = self.auth.logout().await {
            warn!(%error, "backend logout failed; clearing local session anyway");
        }
        self.state.discard(self.storage.as_ref());
    }

    fn commit(&self, grant: &LoginGrant) -> Result<(), SessionError> {
        let encoded = encode_profile(&grant.user_info)?;
        self.persist(&grant.token, &encoded)?;
        self.state
            .replace(grant.token.clone(), grant.user_info.clone());
        Ok(())
    }

    fn persist(&self, token: &str, profile: &str) -> Result<(), StorageError> {
        let previous = [TOKEN_KEY, USER_INFO_KEY].map(|key| (key, self.storage.get(key)));
        let written = self
            .storage
            .set(TOKEN_KEY, token)
            .and_then(|()| self.storage.set(USER_INFO_KEY, profile));
        if let Err(error) = written {
            for (key, value) in previous {
                self.restore(key, value);
            }
            return Err(error);
        }
        Ok(())
    }

    fn restore(&self, key: &str, previous: Result<Option<String>, StorageError>) {
        let restored = match previous {
            Ok(Some(value)) => self.storage.set(key, &value),
            Ok(None) => self.storage.remove(key),
            // Prior value unknown.
            Err(_) => self.storage.remove(key),
        };
        if let Err(error) = restored {
            warn!(%error, key, "failed to roll back session entry");
        }
    }
}

fn encode_profile(profile: &UserProfile) -> Result<String, SessionError> {
    serde_json::to_string(profile).map_err(|error| SessionError::Encode {
        message: error.to_string(),
    })
}
