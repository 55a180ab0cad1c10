//! Session-related types for admin authentication.
//!
//! The platform issues an opaque bearer token at sign-in together with a
//! profile of the signed-in admin. Both are kept side by side and are only
//! ever replaced or removed together.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use utpfund_core::AdminId;

/// Profile of the signed-in admin, as returned by `admin/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Admin's platform ID.
    #[serde(alias = "_id")]
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Sign-in address.
    pub email: String,
    /// Role label (e.g., "admin", "superadmin").
    #[serde(default)]
    pub role: String,
}

/// A live session: the bearer token plus the admin it belongs to.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    /// Bearer token attached to every authenticated request.
    pub token: SecretString,
    /// The admin the token was issued to.
    pub admin: AdminIdentity,
}

impl Session {
    /// Pair a token with its admin.
    #[must_use]
    pub const fn new(token: SecretString, admin: AdminIdentity) -> Self {
        Self { token, admin }
    }

    /// Whether this session carries exactly `token`.
    #[must_use]
    pub fn holds(&self, token: &SecretString) -> bool {
        self.token.expose_secret() == token.expose_secret()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("admin", &self.admin)
            .finish()
    }
}

/// Storage slot names for the persisted session.
pub mod keys {
    /// Slot holding the bearer token.
    pub const TOKEN: &str = "adminToken";

    /// Slot holding the serialized admin profile.
    pub const ADMIN: &str = "adminUser";
}
