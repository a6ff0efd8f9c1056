//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed transport for the community backend
//! - **storage**: file-backed durable storage via the `local-storage` crate
//! - **notifier**: notices rendered as structured log events
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no session or navigation logic.

pub mod http;
pub mod notifier;
pub mod storage;
