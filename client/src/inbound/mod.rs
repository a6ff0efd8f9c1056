//! Inbound adapters: navigation and session-event handling driven by the UI.

pub mod router;
pub mod session_events;

pub use router::{Location, NavigationOutcome, Router};
pub use session_events::{SessionAwareTransport, SessionInvalidationHandler};
