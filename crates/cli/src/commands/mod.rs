//! Command implementations and the shared backend connection.
//!
//! # Environment Variables
//!
//! - `BACKEND_URL` - Hosted backend project URL
//! - `BACKEND_SERVICE_ROLE_KEY` - Service-role key (bypasses row-level security)
//! - `BACKEND_ANON_KEY` - Optional; the service-role key is used when unset

pub mod admin;
pub mod seed;

use luxe_backend::{BackendClient, BackendConfig, BackendError};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The backend rejected or failed a request.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Invalid user id.
    #[error("Invalid user id: {0} (expected a UUID)")]
    InvalidUserId(String),
}

fn required_env(key: &'static str) -> Result<String, CliError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(CliError::MissingEnvVar(key))
}

/// Build a service-role client from the environment.
///
/// # Errors
///
/// Returns an error if `BACKEND_URL` or `BACKEND_SERVICE_ROLE_KEY` is
/// missing, or the URL is invalid.
pub fn service_client() -> Result<BackendClient, CliError> {
    dotenvy::dotenv().ok();

    let url = required_env("BACKEND_URL")?;
    let service_key = SecretString::from(required_env("BACKEND_SERVICE_ROLE_KEY")?);
    let anon_key = required_env("BACKEND_ANON_KEY")
        .map_or_else(|_| service_key.clone(), SecretString::from);

    let config = BackendConfig::new(&url, anon_key, Some(service_key))?;
    tracing::debug!(?config, "Connecting to backend");
    Ok(BackendClient::with_service_role(&config)?)
}

/// Check that the backend answers with the service-role key.
///
/// # Errors
///
/// Returns an error if the backend is unreachable or refuses the key.
pub async fn ping(client: &BackendClient) -> Result<(), CliError> {
    client.ping().await?;
    tracing::info!("Backend is reachable");
    Ok(())
}
