//! Client-side router: static route table plus the navigation guard.
//!
//! Every [`Router::push`] resolves the path, follows redirect routes and
//! evaluates [`evaluate`] against the live session before the location
//! changes. [`Navigator::redirect`] skips the guard; it is reserved for
//! forced moves such as session invalidation.

mod path;
mod routes;

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

pub use routes::{HOME_PATH, LOGIN_PATH, ROOT_PATH, ROUTES, Route, RouteTarget};

use crate::domain::ports::{Navigator, Notice, Notifier};
use crate::domain::{NavigationDecision, SessionState, evaluate};

const MAX_REDIRECT_HOPS: usize = 8;

/// Where the client currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Normalised concrete path, e.g. `/product/42`.
    pub path: String,
    /// Route name, e.g. `ProductDetail`.
    pub name: &'static str,
    /// Values captured from `:param` segments.
    pub params: BTreeMap<String, String>,
    /// Hide the main navigation bar.
    pub hide_nav: bool,
}

/// Result of one guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target was opened.
    Arrived(Location),
    /// Authentication required; the login page was opened instead.
    RedirectedToLogin(Location),
    /// Role refused; a notice was emitted and the home page opened.
    Denied(Location),
    /// No route matches; the location is unchanged.
    NotFound {
        /// The path that failed to resolve.
        path: String,
    },
}

impl NavigationOutcome {
    /// Location after the navigation, if it changed.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Arrived(location)
            | Self::RedirectedToLogin(location)
            | Self::Denied(location) => Some(location),
            Self::NotFound { .. } => None,
        }
    }
}

/// Guarded router over [`ROUTES`].
pub struct Router {
    session: SessionState,
    notifier: Arc<dyn Notifier>,
    location: RwLock<Location>,
}

impl Router {
    /// Create a router positioned at the root route.
    pub fn new(session: SessionState, notifier: Arc<dyn Notifier>) -> Self {
        let location = resolve(ROOT_PATH).unwrap_or_default();
        Self {
            session,
            notifier,
            location: RwLock::new(location),
        }
    }

    /// Current location.
    pub fn location(&self) -> Location {
        self.location
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Navigate to `path`, consulting the guard.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use client::domain::SessionState;
    /// use client::domain::ports::RecordingNotifier;
    /// use client::inbound::router::{NavigationOutcome, Router};
    ///
    /// let router = Router::new(SessionState::default(), Arc::new(RecordingNotifier::default()));
    /// let outcome = router.push("/cart");
    /// assert!(matches!(outcome, NavigationOutcome::RedirectedToLogin(_)));
    /// assert_eq!(router.location().path, "/login");
    /// ```
    pub fn push(&self, path: &str) -> NavigationOutcome {
        let Some((target, route)) = resolve_route(path) else {
            debug!(path, "no route matches");
            return NavigationOutcome::NotFound {
                path: path.to_owned(),
            };
        };

        let decision = evaluate(
            &route.meta,
            self.session.is_logged_in(),
            self.session.role(),
        );
        match decision {
            NavigationDecision::Allow => NavigationOutcome::Arrived(self.set(target)),
            NavigationDecision::RedirectToLogin => {
                debug!(path = %target.path, "authentication required");
                NavigationOutcome::RedirectedToLogin(self.land(LOGIN_PATH))
            }
            NavigationDecision::Deny => {
                self.notifier.notify(Notice::AccessDenied {
                    path: target.path.clone(),
                });
                NavigationOutcome::Denied(self.land(ROOT_PATH))
            }
        }
    }

    fn land(&self, path: &str) -> Location {
        match resolve(path) {
            Some(location) => self.set(location),
            None => self.location(),
        }
    }

    fn set(&self, location: Location) -> Location {
        let mut current = self
            .location
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        current.clone_from(&location);
        location
    }
}

impl Navigator for Router {
    fn redirect(&self, path: &str) {
        debug!(path, "forced navigation");
        self.land(path);
    }
}

fn resolve(path: &str) -> Option<Location> {
    resolve_route(path).map(|(location, _)| location)
}

/// Resolve `path` to a view route, following redirect routes.
fn resolve_route(path: &str) -> Option<(Location, &'static Route)> {
    let mut current = path::normalise(path);
    for _ in 0..MAX_REDIRECT_HOPS {
        let (route, params) = ROUTES.iter().find_map(|route| {
            path::match_pattern(route.path, &current).map(|params| (route, params))
        })?;
        match route.target {
            RouteTarget::Redirect(next) => current = next.to_owned(),
            RouteTarget::View(_) => {
                let location = Location {
                    path: current,
                    name: route.name,
                    params,
                    hide_nav: route.meta.hide_nav,
                };
                return Some((location, route));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    //! Regression coverage for guarded navigation.
    use super::*;
    use crate::domain::ports::RecordingNotifier;
    use crate::domain::{Role, Session, UserProfile};
    use rstest::rstest;

    fn session(role: Option<Role>) -> SessionState {
        match role {
            Some(role) => SessionState::new(Session::new(
                "token",
                Some(UserProfile {
                    role,
                    ..UserProfile::default()
                }),
            )),
            None => SessionState::default(),
        }
    }

    fn router(role: Option<Role>) -> (Router, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (Router::new(session(role), notifier.clone()), notifier)
    }

    #[test]
    fn starts_at_home() {
        let (router, _) = router(None);
        assert_eq!(router.location().path, HOME_PATH);
        assert_eq!(router.location().name, "Home");
    }

    #[test]
    fn captures_route_params() {
        let (router, _) = router(None);
        let outcome = router.push("/product/42?from=mall");
        let location = outcome.location().expect("arrived");
        assert_eq!(location.name, "ProductDetail");
        assert_eq!(location.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn anonymous_user_is_sent_to_login() {
        let (router, notifier) = router(None);
        let outcome = router.push("/profile");
        assert!(matches!(outcome, NavigationOutcome::RedirectedToLogin(_)));
        let location = router.location();
        assert_eq!(location.path, LOGIN_PATH);
        assert!(location.hide_nav);
        assert!(notifier.notices().is_empty());
    }

    #[rstest]
    #[case::store_on_users(Role::Store, "/admin/users")]
    #[case::property_on_products(Role::Property, "/admin/products")]
    #[case::user_on_console(Role::User, "/admin")]
    #[case::guest_on_console(Role::Guest, "/admin")]
    #[case::unknown_on_console(Role::Unknown, "/admin")]
    fn insufficient_role_is_denied(#[case] role: Role, #[case] path: &str) {
        let (router, notifier) = router(Some(role));
        router.push("/mall");

        let outcome = router.push(path);

        assert!(matches!(outcome, NavigationOutcome::Denied(_)));
        assert_eq!(router.location().path, HOME_PATH);
        assert_eq!(
            notifier.notices(),
            vec![Notice::AccessDenied {
                path: path.to_owned()
            }]
        );
    }

    #[rstest]
    #[case(Role::Admin, "/admin/users")]
    #[case(Role::Store, "/admin/orders")]
    #[case(Role::Property, "/admin/property-fee")]
    #[case(Role::Property, "/admin")]
    #[case(Role::User, "/cart")]
    fn permitted_role_arrives(#[case] role: Role, #[case] path: &str) {
        let (router, _) = router(Some(role));
        let outcome = router.push(path);
        assert!(matches!(outcome, NavigationOutcome::Arrived(_)));
        assert_eq!(router.location().path, path);
    }

    #[test]
    fn guard_reads_live_session() {
        let (router, _) = router(None);
        router.push("/cart");
        assert_eq!(router.location().path, LOGIN_PATH);

        router.session.replace("token".to_owned(), UserProfile::default());
        router.push("/cart");
        assert_eq!(router.location().path, "/cart");
    }

    #[test]
    fn unknown_path_leaves_location() {
        let (router, _) = router(None);
        router.push("/mall");
        let outcome = router.push("/nowhere");
        assert_eq!(
            outcome,
            NavigationOutcome::NotFound {
                path: "/nowhere".to_owned()
            }
        );
        assert_eq!(router.location().path, "/mall");
    }

    #[test]
    fn forced_redirect_skips_guard() {
        let (router, notifier) = router(None);
        router.redirect("/admin/users");
        assert_eq!(router.location().path, "/admin/users");
        assert!(notifier.notices().is_empty());
    }
}
