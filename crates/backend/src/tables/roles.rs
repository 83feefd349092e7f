//! Role lookups and grants over `user_roles`.

use luxe_core::{AppRole, UserId};
use secrecy::SecretString;

use super::USER_ROLES;
use crate::client::BackendClient;
use crate::error::BackendError;
use crate::rows::UserRoleRow;

/// Repository for `user_roles`.
pub struct RoleRepository<'a> {
    client: &'a BackendClient,
    token: Option<&'a SecretString>,
}

impl<'a> RoleRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient, token: Option<&'a SecretString>) -> Self {
        Self { client, token }
    }

    /// Whether the user has an admin row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn is_admin(&self, user_id: UserId) -> Result<bool, BackendError> {
        let row: Option<UserRoleRow> = self
            .client
            .from(USER_ROLES)
            .select("user_id, role")
            .eq("user_id", user_id)
            .eq("role", AppRole::Admin)
            .with_token(self.token)
            .fetch_optional()
            .await?;
        Ok(row.is_some())
    }

    /// Give the user the admin role. Granting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    pub async fn grant_admin(&self, user_id: UserId) -> Result<bool, BackendError> {
        if self.is_admin(user_id).await? {
            return Ok(false);
        }
        self.client
            .from(USER_ROLES)
            .with_token(self.token)
            .insert(&UserRoleRow {
                user_id,
                role: AppRole::Admin,
            })
            .await?;
        Ok(true)
    }

    /// Remove the user's admin role, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn revoke_admin(&self, user_id: UserId) -> Result<bool, BackendError> {
        let affected = self
            .client
            .from(USER_ROLES)
            .eq("user_id", user_id)
            .eq("role", AppRole::Admin)
            .with_token(self.token)
            .delete()
            .await?;
        Ok(affected > 0)
    }
}
