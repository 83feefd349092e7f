//! End-to-end tests for the LUXE storefront and admin console.
//!
//! The tests talk to running servers over HTTP, so they are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p luxe-storefront &
//! cargo run -p luxe-admin &
//! cargo test -p luxe-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Defaults to `http://localhost:3000`
//! - `ADMIN_BASE_URL` - Defaults to `http://localhost:3001`
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` - An account holding the
//!   admin role (grant it with `luxe-cli admin grant <user-id>`)
//! - `TEST_SHOPPER_EMAIL` / `TEST_SHOPPER_PASSWORD` - An account without it

use reqwest::{Client, redirect};

/// Storefront base URL.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin console base URL.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Client with a cookie jar that does not follow redirects, so tests can
/// assert on each `303`.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .unwrap_or_else(|e| panic!("Failed to create HTTP client: {e}"))
}

/// Credentials from the environment, if both variables are set.
#[must_use]
pub fn credentials(email_var: &str, password_var: &str) -> Option<(String, String)> {
    Some((std::env::var(email_var).ok()?, std::env::var(password_var).ok()?))
}

/// `Location` header of a response, or an empty string.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Sign in to the admin console.
///
/// Returns `None` when no admin credentials are configured.
///
/// # Panics
///
/// Panics if the request fails or the account is not let in.
pub async fn admin_client() -> Option<Client> {
    let (email, password) = credentials("TEST_ADMIN_EMAIL", "TEST_ADMIN_PASSWORD")?;
    let client = client();

    let response = client
        .post(format!("{}/auth/login", admin_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .unwrap_or_else(|e| panic!("Admin sign-in request failed: {e}"));

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER, "admin sign-in was refused");
    assert_eq!(location(&response), "/");
    Some(client)
}
