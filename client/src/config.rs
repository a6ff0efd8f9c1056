//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `COMMUNITY_*` environment variables (and any
//! configuration file OrthoConfig discovers). [`ClientSettings::resolve`]
//! validates them into a [`ClientConfig`] the composition root consumes.

use std::ffi::OsString;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::api::{CartUpdateMethod, UnsupportedCartUpdateMethod};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_STORAGE_DIR: &str = ".community";

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMMUNITY")]
pub struct ClientSettings {
    /// Backend origin; `/api/v1` is appended.
    pub base_url: Option<String>,
    /// Default request timeout in milliseconds.
    #[ortho_config(default = 10_000)]
    pub timeout_ms: u64,
    /// Timeout for assistant chat calls in milliseconds.
    #[ortho_config(default = 60_000)]
    pub chat_timeout_ms: u64,
    /// Directory holding the durable session document.
    pub storage_dir: Option<String>,
    /// HTTP method used to update cart quantities (`post`, `put`, `patch`).
    pub cart_update_method: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub chat_timeout: Duration,
    pub storage_dir: Utf8PathBuf,
    pub cart_update_method: CartUpdateMethod,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Sources could not be read or merged.
    #[error("failed to load configuration: {message}")]
    Load { message: String },
    /// `base_url` is not an absolute http(s) URL.
    #[error("invalid base_url `{value}`: {message}")]
    InvalidBaseUrl { value: String, message: String },
    /// A timeout was configured as zero.
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
    #[error(transparent)]
    CartUpdateMethod(#[from] UnsupportedCartUpdateMethod),
}

impl ClientSettings {
    /// Load settings for the `community` binary from the environment.
    ///
    /// Command-line arguments belong to the CLI, so only the program name is
    /// passed to OrthoConfig.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("community")]).map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Return the configured backend origin, falling back to the default.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the durable storage directory, falling back to the default.
    pub fn storage_dir(&self) -> &str {
        self.storage_dir.as_deref().unwrap_or(DEFAULT_STORAGE_DIR)
    }

    /// Validate every value.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn resolve(&self) -> Result<ClientConfig, ConfigError> {
        let cart_update_method = match self.cart_update_method.as_deref() {
            Some(raw) => raw.parse()?,
            None => CartUpdateMethod::default(),
        };
        Ok(ClientConfig {
            base_url: parse_base_url(self.base_url())?,
            timeout: positive_millis("timeout_ms", self.timeout_ms)?,
            chat_timeout: positive_millis("chat_timeout_ms", self.chat_timeout_ms)?,
            storage_dir: Utf8PathBuf::from(self.storage_dir()),
            cart_update_method,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidBaseUrl {
        value: raw.to_owned(),
        message,
    };
    let url = Url::parse(raw.trim()).map_err(|error| invalid(error.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme `{scheme}`"))),
    }
}

fn positive_millis(field: &'static str, millis: u64) -> Result<Duration, ConfigError> {
    if millis == 0 {
        return Err(ConfigError::ZeroTimeout { field });
    }
    Ok(Duration::from_millis(millis))
}
