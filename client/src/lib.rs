//! Smart-community client library modules.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod stores;

pub use app::{AppError, AppState};
pub use config::{ClientConfig, ClientSettings, ConfigError};
