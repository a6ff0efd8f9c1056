//! Notices rendered as structured log events.

use tracing::warn;

use crate::domain::ports::{Notice, Notifier};

/// [`Notifier`] that emits each notice as a `warn` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::AccessDenied { path } => {
                warn!(%path, "access denied: insufficient role");
            }
        }
    }
}
