//! Driven ports for forced navigation and user-facing notices.

use std::sync::{Mutex, PoisonError};

/// Notice shown to the user outside the normal view flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The current role may not open `path`.
    AccessDenied {
        /// Path the user attempted to open.
        path: String,
    },
}

/// Port for unguarded navigation, used when the session is torn down.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Move to `path` without evaluating the navigation guard.
    fn redirect(&self, path: &str);
}

/// Port for emitting user-facing notices.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show `notice` to the user.
    fn notify(&self, notice: Notice);
}

/// Navigator fixture that records redirect targets.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Redirect targets received so far.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
    }
}

/// Notifier fixture that records notices.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
