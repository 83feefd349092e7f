//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                             - Home page
//! GET  /health                       - Liveness
//! GET  /health/ready                 - Readiness (backend reachable)
//!
//! # Catalog
//! GET  /products                     - Listing (?category=<slug>, ?featured=true)
//! GET  /product/{slug}               - Product detail
//!
//! # Cart
//! GET  /cart                         - Cart page
//! POST /cart/add                     - Add one unit of a product
//! POST /cart/update                  - Set a line's quantity (<= 0 removes)
//! POST /cart/remove                  - Remove a line
//! GET  /cart/count                   - Cart count badge (fragment)
//!
//! # Checkout (requires sign-in)
//! GET  /checkout                     - Shipping form and order summary
//! POST /checkout                     - Place the order
//! GET  /checkout/confirmation/{id}   - Order confirmation
//!
//! # Auth
//! GET  /auth                         - Sign-in / sign-up page
//! POST /auth/sign-in                 - Password sign-in
//! POST /auth/sign-up                 - Create an account
//! POST /auth/sign-out                - Sign out (the cart is kept)
//!
//! # Seller dashboard
//! GET  /sell                         - My products
//! GET  /sell/new                     - Submission form
//! POST /sell                         - Submit a product for review
//! GET  /sell/{id}/edit               - Edit form (not for approved products)
//! POST /sell/{id}                    - Update and resubmit
//! POST /sell/{id}/delete             - Delete
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod products;
pub mod sell;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// The form posts are rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .layer(auth_rate_limiter())
        .route("/", get(auth::page))
        .route("/sign-out", post(auth::sign_out))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/confirmation/{id}", get(checkout::confirmation))
}

/// Create the seller dashboard routes router.
pub fn sell_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sell::index).post(sell::create))
        .route("/new", get(sell::new_product))
        .route("/{id}", post(sell::update))
        .route("/{id}/edit", get(sell::edit))
        .route("/{id}/delete", post(sell::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/products", get(products::index))
        .route("/product/{slug}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/sell", sell_routes())
}
