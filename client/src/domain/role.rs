//! Account roles recognised by the community platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role attached to a user profile.
///
/// A profile without a role (or with a blank one) decodes as [`Role::Guest`].
/// Role codes created on the backend that the client does not model decode
/// as [`Role::Unknown`], which no admin route admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Merchant operating a store.
    Store,
    /// Property-management staff.
    Property,
    /// Resident.
    User,
    /// No role assigned.
    #[default]
    #[serde(alias = "")]
    Guest,
    /// Backend role code outside the set above.
    #[serde(other)]
    Unknown,
}

/// Roles allowed into admin routes that declare no explicit role set.
pub const DEFAULT_ADMIN_ROLES: &[Role] = &[Role::Admin, Role::Store, Role::Property];

impl Role {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Store => "store",
            Self::Property => "property",
            Self::User => "user",
            Self::Guest => "guest",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "store" => Ok(Self::Store),
            "property" => Ok(Self::Property),
            "user" => Ok(Self::User),
            "guest" => Ok(Self::Guest),
            "unknown" => Ok(Self::Unknown),
            other => Err(UnknownRoleError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for role parsing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"admin\"", Role::Admin)]
    #[case("\"store\"", Role::Store)]
    #[case("\"property\"", Role::Property)]
    #[case("\"user\"", Role::User)]
    #[case("\"guest\"", Role::Guest)]
    fn decodes_known_roles(#[case] raw: &str, #[case] expected: Role) {
        let role: Role = serde_json::from_str(raw).expect("known role");
        assert_eq!(role, expected);
        assert_eq!(raw.trim_matches('"').parse::<Role>(), Ok(expected));
    }

    #[rstest]
    #[case("\"resident\"")]
    #[case("\"Admin\"")]
    fn unmodelled_codes_decode_as_unknown(#[case] raw: &str) {
        let role: Role = serde_json::from_str(raw).expect("any string decodes");
        assert_eq!(role, Role::Unknown);
        assert!(raw.trim_matches('"').parse::<Role>().is_err());
    }

    #[rstest]
    #[case(Role::User)]
    #[case(Role::Guest)]
    #[case(Role::Unknown)]
    fn default_admin_roles_exclude(#[case] role: Role) {
        assert!(!DEFAULT_ADMIN_ROLES.contains(&role));
    }
}
