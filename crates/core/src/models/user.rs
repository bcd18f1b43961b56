//! User records and the session identity.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::types::UserId;

/// Display name reserved for the administrator account.
pub const ADMIN_NAME: &str = "admin";

/// Substring that marks an administrator email address.
pub const ADMIN_EMAIL_MARKER: &str = "admin";

/// A user record (`usuarios`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "id_usuario", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// The logged-in user as held by the session.
///
/// The login endpoint returns the same shape as a `usuarios` record.
pub type Identity = User;

impl User {
    /// Whether this user may enter the administration area.
    ///
    /// The backend exposes no role field, so administrators are recognised
    /// by a display name of `admin` (any case) or an email containing
    /// `admin`.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        let by_name = self
            .name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(ADMIN_NAME));
        let by_email = self
            .email
            .as_deref()
            .is_some_and(|email| email.contains(ADMIN_EMAIL_MARKER));
        by_name || by_email
    }

    /// Best human-readable label for the user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("(anonymous)")
    }
}

impl Resource for User {
    const PATH: &'static str = "usuarios";
    const COLLECTION_KEY: &'static str = "usuarios";
    type Id = UserId;
    type Create = UserInput;
    type Update = UserInput;
}

/// Payload for creating (registering) or updating a user.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default, Serialize)]
pub struct UserInput {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl fmt::Debug for UserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("phone", &self.phone)
            .field("address", &self.address)
            .finish()
    }
}
