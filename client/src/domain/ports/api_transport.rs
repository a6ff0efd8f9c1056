//! Driven port for calling the community backend.
//!
//! The domain owns the request shape and the error taxonomy so API facades
//! and stores stay independent of the HTTP client. Adapters return the
//! unwrapped `data` member of the response envelope.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// HTTP verb used for one backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case wire name of the verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend call described as a `(method, path, payload)` triple.
///
/// `path` is relative to the API base (`/api/v1`) and starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the API base.
    pub path: String,
    /// Query parameters, already stripped of unset values.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Per-call timeout overriding the adapter default.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    /// Build a request with no query, body or timeout override.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach query parameters.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the adapter's default timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

define_port_error! {
    /// Errors surfaced while calling the backend.
    pub enum ApiTransportError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "backend transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "backend request timed out: {message}",
        /// The backend answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "{message}",
        /// The envelope carried a non-success application code.
        Application { code: i64, message: String } =>
            "{message}",
        /// The backend rejected the credentials (HTTP 401 or envelope code 401).
        SessionInvalidated { message: String } =>
            "{message}",
        /// The response body was not a valid envelope or payload.
        Decode { message: String } =>
            "backend response decode failed: {message}",
        /// The request could not be built.
        InvalidRequest { message: String } =>
            "backend request invalid: {message}",
    }
}

impl ApiTransportError {
    /// Return whether the backend signalled that the session is no longer valid.
    pub fn is_session_invalidated(&self) -> bool {
        matches!(self, Self::SessionInvalidated { .. })
    }
}

/// Port for sending one request to the backend and receiving its `data`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send `request` and return the unwrapped envelope `data`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use client::domain::ports::{ApiRequest, ApiTransport, RecordingApiTransport};
    ///
    /// let transport = RecordingApiTransport::default();
    /// let data = transport.call(&ApiRequest::get("/user/info")).await?;
    /// assert!(data.is_null());
    /// # Ok::<(), client::domain::ports::ApiTransportError>(())
    /// ```
    async fn call(&self, request: &ApiRequest) -> Result<Value, ApiTransportError>;
}

/// Fixture transport that records requests and replays queued responses.
///
/// Once the queue is empty every call resolves to `Ok(Value::Null)`.
#[derive(Debug, Default)]
pub struct RecordingApiTransport {
    responses: Mutex<VecDeque<Result<Value, ApiTransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingApiTransport {
    /// Queue a response for the next unanswered call.
    pub fn push_response(&self, response: Result<Value, ApiTransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl ApiTransport for RecordingApiTransport {
    async fn call(&self, request: &ApiRequest) -> Result<Value, ApiTransportError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses).pop_front().unwrap_or(Ok(Value::Null))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
