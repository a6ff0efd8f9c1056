//! Domain types, the navigation guard and the ports the client depends on.
//!
//! Nothing in this module performs I/O directly; adapters plug in through
//! [`ports`].

pub mod auth;
pub mod cart;
pub mod catalogue;
pub mod navigation;
pub mod ports;
pub mod profile;
pub mod role;
pub mod session;

pub use self::auth::{CodeCredentials, CredentialsValidationError, PasswordCredentials, Registration};
pub use self::cart::{CartItem, CartSnapshot, CartState};
pub use self::catalogue::Product;
pub use self::navigation::{NavigationDecision, RouteMeta, evaluate};
pub use self::profile::UserProfile;
pub use self::role::{DEFAULT_ADMIN_ROLES, Role, UnknownRoleError};
pub use self::session::{LoginGrant, Session, SessionState};
