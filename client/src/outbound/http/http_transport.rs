//! Reqwest-backed backend transport.
//!
//! This adapter owns transport details only: URL construction, bearer
//! credentials, timeouts, HTTP error mapping and envelope unwrapping. It
//! never touches the session or navigates; a rejected session surfaces as
//! [`ApiTransportError::SessionInvalidated`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::{EnvelopeDto, SESSION_INVALID_CODE, SUCCESS_CODE, message_from_body};
use crate::domain::ports::{
    ApiRequest, ApiTransport, ApiTransportError, DurableStorage, Method, TOKEN_KEY,
};

/// Path prefix under which every backend route is mounted.
pub const API_BASE_PATH: &str = "/api/v1";
/// Timeout applied to calls without an override.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const SESSION_EXPIRED_MESSAGE: &str = "session expired";
const REQUEST_FAILED_MESSAGE: &str = "request failed";

/// Backend transport that sends JSON requests to one origin.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    storage: Arc<dyn DurableStorage>,
}

impl HttpTransport {
    /// Build a transport for `origin` (scheme, host and optional path prefix).
    ///
    /// ```rust,ignore
    /// let transport = HttpTransport::new(&origin, DEFAULT_TIMEOUT, storage)?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ApiTransportError::InvalidRequest`] when `origin` cannot
    /// carry a path, and [`ApiTransportError::Transport`] when the reqwest
    /// client cannot be constructed.
    pub fn new(
        origin: &Url,
        timeout: Duration,
        storage: Arc<dyn DurableStorage>,
    ) -> Result<Self, ApiTransportError> {
        let base_url = api_base_url(origin)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiTransportError::transport(error.to_string()))?;
        Ok(Self {
            client,
            base_url,
            storage,
        })
    }

    /// Base URL every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn bearer_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(error) => {
                warn!(%error, "failed to read token; sending request without credentials");
                None
            }
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn call(&self, request: &ApiRequest) -> Result<Value, ApiTransportError> {
        let url = endpoint_url(&self.base_url, &request.path)?;
        let mut builder = self.client.request(reqwest_method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        debug!(method = %request.method, path = %request.path, "dispatching backend request");
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        unwrap_envelope(status, body.as_ref()).inspect_err(|error| {
            warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                %error,
                "backend rejected request"
            );
        })
    }
}

fn api_base_url(origin: &Url) -> Result<Url, ApiTransportError> {
    if origin.cannot_be_a_base() {
        return Err(ApiTransportError::invalid_request(format!(
            "backend origin cannot carry a path: {origin}"
        )));
    }
    let mut base = origin.clone();
    let prefix = origin.path().trim_end_matches('/');
    base.set_path(&format!("{prefix}{API_BASE_PATH}/"));
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

fn endpoint_url(base: &Url, path: &str) -> Result<Url, ApiTransportError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|error| ApiTransportError::invalid_request(format!("{path}: {error}")))
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Turn a raw response into envelope `data` or a typed error.
fn unwrap_envelope(status: StatusCode, body: &[u8]) -> Result<Value, ApiTransportError> {
    if status == StatusCode::UNAUTHORIZED {
        let message =
            message_from_body(body).unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_owned());
        return Err(ApiTransportError::session_invalidated(message));
    }
    if !status.is_success() {
        return Err(map_status_error(status, body));
    }

    let envelope: EnvelopeDto = serde_json::from_slice(body).map_err(|error| {
        ApiTransportError::decode(format!("invalid response envelope: {error}"))
    })?;
    match envelope.code {
        SUCCESS_CODE => Ok(envelope.data),
        SESSION_INVALID_CODE => Err(ApiTransportError::session_invalidated(
            envelope.message().unwrap_or(SESSION_EXPIRED_MESSAGE),
        )),
        code => Err(ApiTransportError::application(
            code,
            envelope.message().unwrap_or(REQUEST_FAILED_MESSAGE),
        )),
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiTransportError {
    if error.is_timeout() {
        ApiTransportError::timeout(error.to_string())
    } else {
        ApiTransportError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiTransportError {
    let message = message_from_body(body)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
    ApiTransportError::status(status.as_u16(), message)
}
