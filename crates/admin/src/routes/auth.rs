//! Authentication route handlers for admin.
//!
//! Admins sign in with the same email and password they use on the
//! storefront. The session is only created once the backend confirms the
//! account holds the admin role; anyone else is signed straight back out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::AuthSession;
use luxe_core::Email;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, set_current_admin};
use crate::models::{CurrentAdmin, Flash};
use crate::state::AppState;

/// Shown to accounts that signed in fine but are not admins.
pub const NOT_AN_ADMIN: &str = "This account does not have admin access";

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub flash: Option<Flash>,
    pub email: String,
    pub error: Option<String>,
}

/// Render the login page.
///
/// GET /auth/login
pub async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth, session: Session) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        flash: Flash::take(&session).await,
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Sign in and verify the admin role.
///
/// POST /auth/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => return login_error(StatusCode::UNPROCESSABLE_ENTITY, form.email, e.to_string()),
    };

    let password = SecretString::from(form.password);
    let auth = match state
        .backend()
        .sign_in_with_password(&email, &password)
        .await
    {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!("Admin sign-in failed: {e}");
            return login_error(StatusCode::UNAUTHORIZED, form.email, e.user_message());
        }
    };

    match state.backend().is_admin(auth.user.id, &auth.access_token).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(user_id = %auth.user.id, "Non-admin attempted to sign in to the console");
            revoke(&state, &auth).await;
            return login_error(StatusCode::FORBIDDEN, form.email, NOT_AN_ADMIN.to_string());
        }
        Err(e) => {
            tracing::error!("Admin role check failed: {e}");
            revoke(&state, &auth).await;
            return login_error(
                StatusCode::BAD_GATEWAY,
                form.email,
                "Could not verify admin access, please try again".to_string(),
            );
        }
    }

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
        return login_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            form.email,
            "Could not start your session, please try again".to_string(),
        );
    }

    let admin = CurrentAdmin { auth };
    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!("Failed to set session: {e}");
        return login_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            form.email,
            "Could not start your session, please try again".to_string(),
        );
    }

    set_sentry_user(&admin.user_id(), admin.email());
    tracing::info!(user_id = %admin.user_id(), "Admin signed in");

    Redirect::to("/").into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    if let Ok(Some(admin)) = session
        .get::<CurrentAdmin>(crate::models::session_keys::CURRENT_ADMIN)
        .await
    {
        revoke(&state, &admin.auth).await;
        tracing::info!(user_id = %admin.user_id(), "Admin signed out");
    }

    // Drop the whole session, flash included
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/auth/login")
}

/// Revoke the tokens at the provider. Failure only leaves a token to expire
/// on its own.
async fn revoke(state: &AppState, auth: &AuthSession) {
    if let Err(e) = state.backend().sign_out(&auth.access_token).await {
        tracing::warn!("Failed to revoke session at provider: {e}");
    }
}

fn login_error(status: StatusCode, email: String, error: String) -> Response {
    (
        status,
        LoginTemplate {
            flash: None,
            email,
            error: Some(error),
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::test_support;

    #[test]
    fn test_login_page_renders_form() {
        let html = LoginTemplate {
            flash: None,
            email: String::new(),
            error: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("action=\"/auth/login\""));
        assert!(html.contains("type=\"password\""));
    }

    #[test]
    fn test_login_error_keeps_email() {
        let html = LoginTemplate {
            flash: None,
            email: "shopper@luxe.test".to_string(),
            error: Some(NOT_AN_ADMIN.to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("value=\"shopper@luxe.test\""));
        assert!(html.contains(NOT_AN_ADMIN));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_backend() {
        let app = crate::app(test_support::state()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("email=not-an-email&password=hunter22"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_logout_redirects_to_login() {
        let app = crate::app(test_support::state()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }
}
