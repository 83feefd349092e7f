//! LUXE Storefront library.
//!
//! The public marketplace site: home page, catalog, product pages, cart,
//! checkout, sign-in, and the seller dashboard. Everything persistent lives
//! in the hosted backend; the only local state is the visitor's session.
//!
//! [`app`] assembles the full router so the binary and the tests serve
//! exactly the same stack.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::cookie::KeyError;
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with its full middleware stack.
///
/// # Errors
///
/// Returns an error if the session secret cannot be turned into a cookie
/// signing key.
pub fn app(state: AppState) -> Result<Router, KeyError> {
    let session_layer = middleware::create_session_layer(state.config())?;

    Ok(Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use luxe_backend::BackendConfig;
    use secrecy::SecretString;

    use crate::config::StorefrontConfig;
    use crate::state::AppState;

    /// State pointing at an unroutable backend; only handlers that never
    /// reach the backend are exercised with it.
    pub fn state() -> AppState {
        let backend = BackendConfig::new(
            "http://127.0.0.1:9",
            SecretString::from("anon"),
            None,
        )
        .unwrap_or_else(|e| panic!("test backend config: {e}"));

        AppState::new(StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(
                "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%dF8(gH1)jI2_kM3+nO4=qS5~vU6<wX7>",
            ),
            backend,
            sentry_dsn: None,
            sentry_environment: "test".to_string(),
            log_json: false,
        })
    }
}
