//! Password authentication against the hosted auth API.
//!
//! # Endpoints
//!
//! - `POST /auth/v1/token?grant_type=password` - sign in
//! - `POST /auth/v1/token?grant_type=refresh_token` - refresh
//! - `POST /auth/v1/signup` - register (may require email confirmation)
//! - `POST /auth/v1/logout` - revoke the caller's session

use luxe_core::{Email, UserId};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::client::BackendClient;
use crate::error::{AuthErrorBody, BackendError};
use crate::tables::RoleRepository;

// =============================================================================
// Types
// =============================================================================

/// A signed-in user as reported by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl AuthUser {
    /// Name to greet the user with: full name, else email, else "there".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("there")
    }
}

/// Tokens for a signed-in user.
///
/// Serializable so the web binaries can keep it in their server-side
/// session store; it is never written to a cookie.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(with = "secret_string")]
    pub access_token: SecretString,
    #[serde(with = "secret_string")]
    pub refresh_token: SecretString,
    /// Unix timestamp at which the access token expires.
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl AuthSession {
    /// Whether the access token expires within `leeway_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: i64, leeway_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - now <= leeway_secs)
    }
}

mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
        String::deserialize(d).map(SecretString::from)
    }
}

/// Result of a sign-up.
#[derive(Debug)]
pub enum SignUpOutcome {
    /// The account was confirmed immediately and is signed in.
    SignedIn(Box<AuthSession>),
    /// The user must confirm their email before signing in.
    ConfirmationRequired { email: String },
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: WireUser,
}

#[derive(Deserialize)]
struct WireUser {
    id: UserId,
    email: Option<String>,
    #[serde(default)]
    user_metadata: WireMetadata,
}

#[derive(Default, Deserialize)]
struct WireMetadata {
    full_name: Option<String>,
}

/// Sign-up returns a token response when auto-confirm is on, and a bare
/// user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    Pending(WireUser),
}

impl From<WireUser> for AuthUser {
    fn from(user: WireUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user
                .user_metadata
                .full_name
                .filter(|name| !name.trim().is_empty()),
        }
    }
}

impl TokenResponse {
    fn into_session(self, now: i64) -> AuthSession {
        AuthSession {
            access_token: SecretString::from(self.access_token),
            refresh_token: SecretString::from(self.refresh_token),
            expires_at: self
                .expires_at
                .or_else(|| self.expires_in.map(|secs| now + secs)),
            user: self.user.into(),
        }
    }
}

// =============================================================================
// Client methods
// =============================================================================

impl BackendClient {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Auth` with the provider's message when the
    /// credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, BackendError> {
        let body = json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        });
        let token: TokenResponse = self
            .auth_call("token?grant_type=password", None, &body)
            .await?;
        debug!("Signed in");
        Ok(token.into_session(chrono::Utc::now().timestamp()))
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Auth` if the provider refuses the sign-up
    /// (e.g. the email is taken or the password too weak).
    #[instrument(skip(self, password, full_name), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
        full_name: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let body = json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
            "data": { "full_name": full_name.trim() },
        });
        let response: SignUpResponse = self.auth_call("signup", None, &body).await?;
        Ok(match response {
            SignUpResponse::Session(token) => {
                debug!("Signed up and signed in");
                SignUpOutcome::SignedIn(Box::new(
                    token.into_session(chrono::Utc::now().timestamp()),
                ))
            }
            SignUpResponse::Pending(user) => {
                debug!("Sign-up awaiting email confirmation");
                SignUpOutcome::ConfirmationRequired {
                    email: user.email.unwrap_or_else(|| email.to_string()),
                }
            }
        })
    }

    /// Exchange a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Auth` if the refresh token is no longer valid.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<AuthSession, BackendError> {
        let body = json!({ "refresh_token": refresh_token.expose_secret() });
        let token: TokenResponse = self
            .auth_call("token?grant_type=refresh_token", None, &body)
            .await?;
        Ok(token.into_session(chrono::Utc::now().timestamp()))
    }

    /// Revoke the caller's session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. An already expired token is
    /// treated as signed out.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &SecretString) -> Result<(), BackendError> {
        let response = self
            .auth_request(Method::POST, "logout", Some(access_token))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(auth_error(status, &body))
    }

    /// Whether the user holds the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lookup fails.
    pub async fn is_admin(
        &self,
        user_id: UserId,
        token: &SecretString,
    ) -> Result<bool, BackendError> {
        RoleRepository::new(self, Some(token)).is_admin(user_id).await
    }

    async fn auth_call<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let response = self
            .auth_request(Method::POST, path, token)
            .json(body)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited(60));
        }

        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = %status, path, "Auth request refused");
            return Err(auth_error(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn auth_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<AuthErrorBody>(body)
        .ok()
        .and_then(AuthErrorBody::into_message)
        .unwrap_or_else(|| format!("HTTP {status}"));
    BackendError::Auth(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const USER_ID: &str = "5b3f6c1e-2a44-4a5e-9d53-0b7a4b1f0c11";

    #[test]
    fn test_token_response_into_session() {
        let json = format!(
            r#"{{
                "access_token": "at",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "rt",
                "user": {{
                    "id": "{USER_ID}",
                    "email": "ada@example.com",
                    "user_metadata": {{ "full_name": "Ada Lovelace" }}
                }}
            }}"#
        );
        let token: TokenResponse = serde_json::from_str(&json).unwrap();
        let session = token.into_session(1_000);
        assert_eq!(session.access_token.expose_secret(), "at");
        assert_eq!(session.expires_at, Some(4_600));
        assert_eq!(session.user.display_name(), "Ada Lovelace");
        assert!(session.expires_within(4_500, 120));
        assert!(!session.expires_within(1_000, 120));
    }

    #[test]
    fn test_sign_up_pending_is_bare_user() {
        let json = format!(r#"{{ "id": "{USER_ID}", "email": "new@example.com" }}"#);
        let response: SignUpResponse = serde_json::from_str(&json).unwrap();
        assert!(matches!(response, SignUpResponse::Pending(_)));
    }

    #[test]
    fn test_blank_full_name_falls_back_to_email() {
        let json =
            format!(r#"{{ "id": "{USER_ID}", "email": "x@y.z", "user_metadata": {{ "full_name": " " }} }}"#);
        let user: AuthUser = serde_json::from_str::<WireUser>(&json).unwrap().into();
        assert_eq!(user.display_name(), "x@y.z");
    }

    #[test]
    fn test_auth_error_message() {
        let err = auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Authentication failed: Invalid login credentials");

        let err = auth_error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"User already registered"}"#);
        assert_eq!(err.user_message(), "User already registered");
    }

    #[test]
    fn test_session_survives_session_store_round_trip() {
        let json = format!(
            r#"{{"access_token":"at","refresh_token":"rt","expires_at":99,"user":{{"id":"{USER_ID}","email":null,"full_name":null}}}}"#
        );
        let session: AuthSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session.refresh_token.expose_secret(), "rt");
        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["access_token"], "at");
        assert_eq!(back["expires_at"], 99);
    }

    #[test]
    fn test_session_debug_redacts_tokens() {
        let session = AuthSession {
            access_token: SecretString::from("secret-access"),
            refresh_token: SecretString::from("secret-refresh"),
            expires_at: None,
            user: AuthUser {
                id: USER_ID.parse().unwrap(),
                email: None,
                full_name: None,
            },
        };
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
