//! Application-root handling of backend session rejection.
//!
//! The HTTP adapter only reports [`ApiTransportError::SessionInvalidated`].
//! [`SessionAwareTransport`] wraps the adapter once so every facade shares the
//! same reaction: tear the session down, force the login page, then return
//! the original error to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domain::SessionState;
use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError, DurableStorage, Navigator};

use super::router::LOGIN_PATH;

/// Clears the session and forces navigation to the login page.
#[derive(Clone)]
pub struct SessionInvalidationHandler {
    state: SessionState,
    storage: Arc<dyn DurableStorage>,
    navigator: Arc<dyn Navigator>,
}

impl SessionInvalidationHandler {
    /// Handler clearing `state` and `storage` and sending `navigator` to login.
    pub fn new(
        state: SessionState,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state,
            storage,
            navigator,
        }
    }

    /// Discard memory and durable session entries, then redirect to login.
    pub fn handle(&self, message: &str) {
        warn!(message, "backend invalidated the session");
        self.state.discard(self.storage.as_ref());
        self.navigator.redirect(LOGIN_PATH);
    }
}

/// [`ApiTransport`] decorator reacting to session invalidation.
pub struct SessionAwareTransport<T> {
    inner: T,
    handler: SessionInvalidationHandler,
}

impl<T: ApiTransport> SessionAwareTransport<T> {
    /// Wrap `inner`, routing session invalidation through `handler`.
    pub fn new(inner: T, handler: SessionInvalidationHandler) -> Self {
        Self { inner, handler }
    }
}

#[async_trait]
impl<T: ApiTransport> ApiTransport for SessionAwareTransport<T> {
    async fn call(&self, request: &ApiRequest) -> Result<Value, ApiTransportError> {
        self.inner.call(request).await.inspect_err(|error| {
            if let ApiTransportError::SessionInvalidated { message } = error {
                self.handler.handle(message);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the session-aware decorator.
    use super::*;
    use crate::domain::ports::{
        InMemoryStorage, MockNavigator, RecordingApiTransport, RecordingNavigator, TOKEN_KEY,
        USER_INFO_KEY,
    };
    use crate::domain::{Session, UserProfile};
    use serde_json::json;

    struct Harness {
        transport: SessionAwareTransport<RecordingApiTransport>,
        state: SessionState,
        storage: Arc<InMemoryStorage>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness(response: Result<Value, ApiTransportError>) -> Harness {
        let storage = Arc::new(InMemoryStorage::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_INFO_KEY, "{\"id\":1}"),
        ]));
        let state = SessionState::new(Session::new("abc", Some(UserProfile::default())));
        let navigator = Arc::new(RecordingNavigator::default());
        let inner = RecordingApiTransport::default();
        inner.push_response(response);
        let handler =
            SessionInvalidationHandler::new(state.clone(), storage.clone(), navigator.clone());
        Harness {
            transport: SessionAwareTransport::new(inner, handler),
            state,
            storage,
            navigator,
        }
    }

    #[tokio::test]
    async fn invalidation_clears_session_and_redirects() {
        let h = harness(Err(ApiTransportError::session_invalidated("expired")));

        let error = h
            .transport
            .call(&ApiRequest::get("/user/info"))
            .await
            .expect_err("rejected");

        assert_eq!(error.to_string(), "expired");
        assert!(!h.state.is_logged_in());
        assert!(h.state.snapshot().profile().is_none());
        assert!(h.storage.is_empty());
        assert_eq!(h.navigator.redirects(), vec![LOGIN_PATH.to_owned()]);
    }

    #[tokio::test]
    async fn other_errors_pass_through_untouched() {
        let h = harness(Err(ApiTransportError::application(500, "余额不足")));

        let error = h
            .transport
            .call(&ApiRequest::post("/finance/pay"))
            .await
            .expect_err("rejected");

        assert_eq!(error, ApiTransportError::application(500, "余额不足"));
        assert!(h.state.is_logged_in());
        assert!(!h.storage.is_empty());
        assert!(h.navigator.redirects().is_empty());
    }

    #[tokio::test]
    async fn success_passes_data_through() {
        let h = harness(Ok(json!({"id": 1})));
        let data = h
            .transport
            .call(&ApiRequest::get("/product/1"))
            .await
            .expect("data");
        assert_eq!(data, json!({"id": 1}));
        assert!(h.navigator.redirects().is_empty());
    }

    #[tokio::test]
    async fn redirect_happens_once_per_rejection() {
        let inner = RecordingApiTransport::default();
        inner.push_response(Err(ApiTransportError::session_invalidated("expired")));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_redirect()
            .withf(|path| path == LOGIN_PATH)
            .times(1)
            .return_const(());
        let handler = SessionInvalidationHandler::new(
            SessionState::default(),
            Arc::new(InMemoryStorage::default()),
            Arc::new(navigator),
        );
        let transport = SessionAwareTransport::new(inner, handler);

        let _ = transport.call(&ApiRequest::get("/cart/list")).await;
    }
}
