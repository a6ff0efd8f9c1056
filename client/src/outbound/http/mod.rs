//! Backend HTTP adapters.
//!
//! This module provides a thin reqwest implementation of the `ApiTransport`
//! port.

mod dto;
mod http_transport;

pub use http_transport::{API_BASE_PATH, DEFAULT_TIMEOUT, HttpTransport};
