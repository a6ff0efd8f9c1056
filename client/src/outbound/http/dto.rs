//! DTO for the backend's `{code, data, msg}` response envelope.
//!
//! The adapter decodes every body into this envelope first, then decides
//! between data and a typed error in one place.

use serde::Deserialize;
use serde_json::Value;

pub(super) const SUCCESS_CODE: i64 = 200;
pub(super) const SESSION_INVALID_CODE: i64 = 401;

#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeDto {
    pub(super) code: i64,
    #[serde(default)]
    pub(super) data: Value,
    #[serde(default)]
    pub(super) msg: Option<String>,
}

impl EnvelopeDto {
    /// Backend message, ignoring blanks.
    pub(super) fn message(&self) -> Option<&str> {
        self.msg.as_deref().filter(|msg| !msg.trim().is_empty())
    }
}

/// Best-effort `msg` extraction from an error body that may not be an envelope.
pub(super) fn message_from_body(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct MessageOnly {
        msg: Option<String>,
    }

    serde_json::from_slice::<MessageOnly>(body)
        .ok()
        .and_then(|parsed| parsed.msg)
        .filter(|msg| !msg.trim().is_empty())
}
