//! Assistant chat endpoint.
//!
//! Replies are generated server-side and can take far longer than ordinary
//! calls, so every request carries its own timeout.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use crate::domain::ports::{ApiRequest, ApiTransport, ApiTransportError};

/// Timeout applied to chat requests unless configured otherwise.
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ChatApi {
    transport: Arc<dyn ApiTransport>,
    timeout: Duration,
}

impl ChatApi {
    /// Facade using the default chat timeout.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self::with_timeout(transport, DEFAULT_CHAT_TIMEOUT)
    }

    /// Facade with a custom per-call chat timeout.
    pub fn with_timeout(transport: Arc<dyn ApiTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// `POST /chat/send`
    pub async fn send(&self, content: &str) -> Result<Value, ApiTransportError> {
        let request = ApiRequest::post("/chat/send")
            .with_body(json!({ "content": content }))
            .with_timeout(self.timeout);
        self.transport.call(&request).await
    }
}
