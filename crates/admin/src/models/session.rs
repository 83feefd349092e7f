//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use luxe_backend::AuthSession;
use luxe_core::UserId;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
///
/// Written only after the sign-in handler confirmed the user holds the
/// admin role. The backend tokens let every table call run as this admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub auth: AuthSession,
}

impl CurrentAdmin {
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.auth.user.id
    }

    /// Name shown in the sidebar.
    #[must_use]
    pub fn name(&self) -> &str {
        self.auth.user.display_name()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.auth.user.email.as_deref()
    }

    /// Access token for backend calls made on the admin's behalf.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.auth.access_token
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}
