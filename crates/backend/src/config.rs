//! Hosted backend connection settings.
//!
//! # Environment Variables
//!
//! - `BACKEND_URL` - Project URL (e.g., `https://abc.backend.example`)
//! - `BACKEND_ANON_KEY` - Public anon key; row-level security applies
//! - `BACKEND_SERVICE_ROLE_KEY` - Optional service-role key (CLI only)

use secrecy::SecretString;
use url::Url;

use crate::error::BackendError;

/// Connection settings for the hosted backend.
///
/// Implements `Debug` manually to redact keys.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project base URL.
    pub url: Url,
    /// Public anon key.
    pub anon_key: SecretString,
    /// Service-role key that bypasses row-level security.
    pub service_role_key: Option<SecretString>,
}

impl BackendConfig {
    /// Build a configuration, validating the URL.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Config` if the URL is not absolute http(s).
    pub fn new(
        url: &str,
        anon_key: SecretString,
        service_role_key: Option<SecretString>,
    ) -> Result<Self, BackendError> {
        let url = Url::parse(url.trim_end_matches('/'))
            .map_err(|e| BackendError::Config(format!("invalid backend url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BackendError::Config(format!(
                "backend url must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(Self {
            url,
            anon_key,
            service_role_key,
        })
    }

    /// Base URL of the table API.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.as_str().trim_end_matches('/'))
    }

    /// Base URL of the auth API.
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url.as_str().trim_end_matches('/'))
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let config =
            BackendConfig::new("https://proj.backend.example/", SecretString::from("k"), None)
                .unwrap();
        assert_eq!(config.rest_url(), "https://proj.backend.example/rest/v1");
        assert_eq!(config.auth_url(), "https://proj.backend.example/auth/v1");
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(BackendConfig::new("ftp://proj", SecretString::from("k"), None).is_err());
        assert!(BackendConfig::new("not a url", SecretString::from("k"), None).is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = BackendConfig::new(
            "https://proj.backend.example",
            SecretString::from("anon-secret-value"),
            Some(SecretString::from("service-secret-value")),
        )
        .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("proj.backend.example"));
        assert!(!debug.contains("anon-secret-value"));
        assert!(!debug.contains("service-secret-value"));
    }
}
