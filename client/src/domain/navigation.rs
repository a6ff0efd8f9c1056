//! Route metadata and the navigation guard.
//!
//! The guard is a pure function of route metadata and the current session
//! facts. Routers evaluate it on every navigation attempt; decisions are
//! never cached.

use super::{DEFAULT_ADMIN_ROLES, Role};

/// Access requirements attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    /// The route needs a signed-in user.
    pub requires_auth: bool,
    /// The route belongs to the admin console.
    pub requires_admin: bool,
    /// Roles admitted to an admin route. `None` or an empty set falls back to
    /// [`DEFAULT_ADMIN_ROLES`].
    pub roles: Option<&'static [Role]>,
    /// Hide the main navigation bar while the route is shown.
    pub hide_nav: bool,
}

impl RouteMeta {
    /// Open to everyone.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
        roles: None,
        hide_nav: false,
    };

    /// Open to everyone, navigation bar hidden.
    pub const PUBLIC_BARE: Self = Self {
        hide_nav: true,
        ..Self::PUBLIC
    };

    /// Signed-in users only.
    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        ..Self::PUBLIC
    };

    /// Signed-in users holding one of `roles`.
    pub const fn admin(roles: &'static [Role]) -> Self {
        Self {
            requires_auth: true,
            requires_admin: true,
            roles: Some(roles),
            hide_nav: false,
        }
    }
}

/// Outcome of evaluating the guard for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Proceed to the target.
    Allow,
    /// Send the user to the login page.
    RedirectToLogin,
    /// Refuse: the role may not open the target.
    Deny,
}

/// Decide whether a user may open a route.
///
/// A user without a profile has no role and is never a member of any role
/// set.
///
/// # Examples
/// ```
/// use client::domain::{evaluate, NavigationDecision, Role, RouteMeta};
///
/// let meta = RouteMeta::admin(&[Role::Admin]);
/// assert_eq!(evaluate(&meta, true, Some(Role::Store)), NavigationDecision::Deny);
/// assert_eq!(evaluate(&meta, false, None), NavigationDecision::RedirectToLogin);
/// ```
pub fn evaluate(meta: &RouteMeta, is_logged_in: bool, role: Option<Role>) -> NavigationDecision {
    if meta.requires_auth && !is_logged_in {
        return NavigationDecision::RedirectToLogin;
    }
    if !meta.requires_admin {
        return NavigationDecision::Allow;
    }

    let admitted = match meta.roles {
        Some(roles) if !roles.is_empty() => roles,
        _ => DEFAULT_ADMIN_ROLES,
    };
    match role {
        Some(role) if admitted.contains(&role) => NavigationDecision::Allow,
        _ => NavigationDecision::Deny,
    }
}
