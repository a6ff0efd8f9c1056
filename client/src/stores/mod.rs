//! State containers driven by UI actions.

mod cart;
mod session;

pub use cart::CartStore;
pub use session::{SessionError, SessionStore};
