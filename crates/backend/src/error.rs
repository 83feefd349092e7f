//! Errors returned by the hosted backend client.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("Backend error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Sign-in, sign-up, or token refresh was refused.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An update or delete was issued without any row filter.
    #[error("Refusing to {0} every row of {1}")]
    UnscopedMutation(&'static str, String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// Whether this error means the row simply does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the backend refused the caller's token (expired or revoked).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Message suitable for showing to the person who submitted a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Auth(message) => message.clone(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::RateLimited(_) => "Too many requests, please try again shortly".to_string(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }
}

/// Error envelope returned by the table API.
#[derive(Debug, Deserialize)]
pub(crate) struct RestErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

/// Error envelope returned by the auth API.
///
/// Older and newer auth servers disagree on field names, so every variant
/// is accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthErrorBody {
    pub error_description: Option<String>,
    pub msg: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl AuthErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Build an `Api` error from a non-success table API response body.
pub(crate) fn rest_error(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<RestErrorBody>(body) {
        Ok(parsed) => {
            let mut message = parsed
                .message
                .unwrap_or_else(|| format!("HTTP {status}"));
            if let Some(details) = parsed.details.filter(|d| !d.is_empty()) {
                message = format!("{message} ({details})");
            }
            if let Some(hint) = parsed.hint.filter(|h| !h.is_empty()) {
                tracing::debug!(hint = %hint, "Backend error hint");
            }
            BackendError::Api {
                status,
                code: parsed.code,
                message,
            }
        }
        Err(_) => BackendError::Api {
            status,
            code: None,
            message: format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_error_uses_envelope() {
        let err = rest_error(
            409,
            r#"{"code":"23505","message":"duplicate key value","details":"Key (slug)=(pen) already exists.","hint":null}"#,
        );
        match err {
            BackendError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("23505"));
                assert!(message.starts_with("duplicate key value"));
                assert!(message.contains("already exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rest_error_falls_back_to_body() {
        let err = rest_error(502, "<html>Bad gateway</html>");
        assert!(err.to_string().contains("Bad gateway"));
    }

    #[test]
    fn test_auth_error_message_precedence() {
        let body: AuthErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap_or(AuthErrorBody {
            error_description: None,
            msg: None,
            message: None,
            error: None,
        });
        assert_eq!(
            body.into_message().as_deref(),
            Some("Invalid login credentials")
        );
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            BackendError::Auth("Invalid login credentials".to_string()).user_message(),
            "Invalid login credentials"
        );
        assert_eq!(
            BackendError::NotFound("Product".to_string()).user_message(),
            "Product not found"
        );
        assert!(
            BackendError::Api {
                status: 401,
                code: None,
                message: "JWT expired".to_string()
            }
            .is_unauthorized()
        );
    }
}
