//! Admin role management.
//!
//! # Usage
//!
//! ```bash
//! luxe-cli admin grant <user-id>
//! luxe-cli admin revoke <user-id>
//! ```
//!
//! The user id is the backend auth user's UUID. The user has to sign out
//! and back in to the console for a change to take effect.

use luxe_backend::BackendClient;
use luxe_backend::tables::RoleRepository;
use luxe_core::UserId;

use super::CliError;

fn parse_user_id(raw: &str) -> Result<UserId, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::InvalidUserId(raw.to_owned()))
}

/// Give a user the admin role.
///
/// # Errors
///
/// Returns an error if the id is not a UUID or the backend rejects the row.
pub async fn grant(client: &BackendClient, user_id: &str) -> Result<(), CliError> {
    let user_id = parse_user_id(user_id)?;

    if RoleRepository::new(client, None).grant_admin(user_id).await? {
        tracing::info!(%user_id, "Admin role granted");
    } else {
        tracing::info!(%user_id, "User is already an admin");
    }
    Ok(())
}

/// Remove the admin role from a user.
///
/// # Errors
///
/// Returns an error if the id is not a UUID or the request fails.
pub async fn revoke(client: &BackendClient, user_id: &str) -> Result<(), CliError> {
    let user_id = parse_user_id(user_id)?;

    if RoleRepository::new(client, None).revoke_admin(user_id).await? {
        tracing::info!(%user_id, "Admin role revoked");
    } else {
        tracing::warn!(%user_id, "User was not an admin");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id_accepts_uuid() {
        let id = parse_user_id(" 0b6f2c1e-8d4a-4c55-9f0e-3f1a2b7c9d10 ").unwrap();
        assert_eq!(id.to_string(), "0b6f2c1e-8d4a-4c55-9f0e-3f1a2b7c9d10");
    }

    #[test]
    fn test_parse_user_id_rejects_email() {
        assert!(matches!(
            parse_user_id("admin@luxe.test"),
            Err(CliError::InvalidUserId(raw)) if raw == "admin@luxe.test"
        ));
    }
}
