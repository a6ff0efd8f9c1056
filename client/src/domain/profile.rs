//! Signed-in user profile as returned by `/user/info` and login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::{Role, UnknownRoleError};

/// Profile of the signed-in account.
///
/// Fields the client does not model are kept in `extra` so that a persisted
/// profile round-trips whatever the backend sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub real_name: String,
    /// Mobile number; doubles as the login name.
    pub mobile: String,
    pub age: i32,
    pub gender: i32,
    pub email: String,
    /// Avatar image URL.
    pub avatar: String,
    /// Wallet balance in yuan.
    pub balance: f64,
    /// Role deciding admin-route access.
    #[serde(deserialize_with = "role_or_guest")]
    pub role: Role,
    /// `1` active, `0` frozen.
    pub status: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn role_or_guest<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let role = match raw.as_deref().map(str::trim) {
        None | Some("") => Role::Guest,
        Some(code) => code.parse().unwrap_or_else(|UnknownRoleError(code)| {
            warn!(role = %code, "unrecognised role code; admin routes stay closed");
            Role::Unknown
        }),
    };
    Ok(role)
}
