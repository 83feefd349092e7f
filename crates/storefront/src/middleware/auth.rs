//! Authentication extractors.
//!
//! The signed-in shopper lives in the session as the backend's
//! [`AuthSession`](luxe_backend::AuthSession). Both extractors refresh the
//! access token when it is about to expire, and sign the user out if the
//! refresh is refused.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, keys};
use crate::state::AppState;

/// Refresh when the access token has less than this many seconds left.
const REFRESH_LEEWAY_SECS: i64 = 60;

/// Extractor that requires a signed-in user.
///
/// If nobody is signed in, returns a redirect to the sign-in page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.user.display_name())
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is signed in.
pub enum AuthRejection {
    /// Redirect to the sign-in page.
    RedirectToLogin,
    /// The session layer is missing.
    NoSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth").into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::NoSession)?;

        current_user(session, state)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// signed in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session, state).await,
            None => None,
        };
        Ok(Self(user))
    }
}

/// Read the session user, refreshing the token if it is close to expiry.
async fn current_user(session: &Session, state: &AppState) -> Option<CurrentUser> {
    let user: CurrentUser = session
        .get(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()?;

    if !user.expires_within(chrono::Utc::now().timestamp(), REFRESH_LEEWAY_SECS) {
        return Some(user);
    }

    match state.backend().refresh(&user.refresh_token).await {
        Ok(fresh) => {
            tracing::debug!(user_id = %fresh.user.id, "Refreshed access token");
            if let Err(e) = set_current_user(session, &fresh).await {
                tracing::warn!(error = %e, "Failed to store refreshed session");
            }
            Some(fresh)
        }
        Err(e) => {
            tracing::info!(error = %e, user_id = %user.user.id, "Token refresh refused, signing out");
            let _ = clear_current_user(session).await;
            None
        }
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (sign-out).
///
/// The cart is left in place.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    Ok(())
}
