//! Authentication route handlers.
//!
//! Email and password sign-in and sign-up against the hosted auth API.
//! Outcomes are reported through flash messages and a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use luxe_backend::{AuthSession, SignUpOutcome};
use luxe_core::Email;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, Flash, PageContext, keys};
use crate::state::AppState;

/// The auth provider refuses shorter passwords.
pub const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form data.
#[derive(Deserialize)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// `?mode=sign-up` opens the sign-up tab.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub mode: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in / sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/index.html")]
pub struct AuthTemplate {
    pub page: PageContext,
    pub sign_up: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the sign-in / sign-up page.
pub async fn page(page: PageContext, Query(query): Query<AuthQuery>) -> AuthTemplate {
    AuthTemplate {
        page,
        sign_up: query.mode.as_deref() == Some("sign-up"),
    }
}

/// Handle the sign-in form.
#[instrument(skip_all)]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Redirect {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            Flash::error(e.to_string()).set(&session).await;
            return Redirect::to("/auth");
        }
    };

    let password = SecretString::from(form.password);
    match state
        .backend()
        .sign_in_with_password(&email, &password)
        .await
    {
        Ok(auth) => {
            if start_session(&session, &auth).await {
                Flash::success("Welcome back!").set(&session).await;
                Redirect::to("/")
            } else {
                Flash::error("Could not start your session, please try again")
                    .set(&session)
                    .await;
                Redirect::to("/auth")
            }
        }
        Err(e) => {
            tracing::warn!("Sign-in failed: {e}");
            Flash::error(e.user_message()).set(&session).await;
            Redirect::to("/auth")
        }
    }
}

/// Handle the sign-up form.
///
/// When the provider requires email confirmation the user is told to check
/// their inbox; otherwise they are signed in straight away.
#[instrument(skip_all)]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> Redirect {
    const RETRY: &str = "/auth?mode=sign-up";

    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            Flash::error(e.to_string()).set(&session).await;
            return Redirect::to(RETRY);
        }
    };

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        Flash::error(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))
        .set(&session)
        .await;
        return Redirect::to(RETRY);
    }

    let password = SecretString::from(form.password);
    match state
        .backend()
        .sign_up(&email, &password, form.full_name.trim())
        .await
    {
        Ok(SignUpOutcome::SignedIn(auth)) => {
            if start_session(&session, &auth).await {
                Flash::success("Account created successfully!").set(&session).await;
                Redirect::to("/")
            } else {
                Flash::error("Account created, please sign in").set(&session).await;
                Redirect::to("/auth")
            }
        }
        Ok(SignUpOutcome::ConfirmationRequired { email }) => {
            Flash::success(format!(
                "Check {email} for a confirmation link, then sign in"
            ))
            .set(&session)
            .await;
            Redirect::to("/auth")
        }
        Err(e) => {
            tracing::warn!("Sign-up failed: {e}");
            Flash::error(e.user_message()).set(&session).await;
            Redirect::to(RETRY)
        }
    }
}

/// Handle sign-out.
///
/// Revokes the token at the provider (best effort) and removes the user
/// from the session. The cart stays.
#[instrument(skip_all)]
pub async fn sign_out(State(state): State<AppState>, session: Session) -> Redirect {
    if let Ok(Some(user)) = session.get::<CurrentUser>(keys::CURRENT_USER).await {
        if let Err(e) = state.backend().sign_out(&user.access_token).await {
            tracing::warn!("Failed to revoke session at provider: {e}");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Flash::success("You have been signed out").set(&session).await;
    Redirect::to("/")
}

/// Store the signed-in user under a fresh session id.
async fn start_session(session: &Session, auth: &AuthSession) -> bool {
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
        return false;
    }
    if let Err(e) = set_current_user(session, auth).await {
        tracing::error!("Failed to set session: {e}");
        return false;
    }
    set_sentry_user(&auth.user.id, auth.user.email.as_deref());
    tracing::info!(user_id = %auth.user.id, "User signed in");
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_tab_is_default() {
        let html = AuthTemplate {
            page: PageContext::default(),
            sign_up: false,
        }
        .render()
        .unwrap();
        assert!(html.contains("action=\"/auth/sign-in\""));
        assert!(html.contains("action=\"/auth/sign-up\""));
        assert!(html.contains("tab-active\" href=\"/auth\""));
    }

    #[test]
    fn test_sign_up_tab_selected() {
        let html = AuthTemplate {
            page: PageContext::default(),
            sign_up: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("tab-active\" href=\"/auth?mode=sign-up\""));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected_before_backend() {
        use axum::{
            body::Body,
            http::{Request, StatusCode, header},
        };
        use tower::ServiceExt;

        let app = crate::app(crate::test_support::state()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/sign-up")
                    .header("x-forwarded-for", "198.51.100.4")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "full_name=Ada&email=ada%40example.com&password=abc",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth?mode=sign-up");
    }
}
