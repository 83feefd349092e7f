//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (backend reachable)
//!
//! # Auth (email + password, admin role required)
//! GET  /auth/login                      - Login page
//! POST /auth/login                      - Sign in and verify the admin role
//! POST /auth/logout                     - Sign out
//!
//! # Dashboard
//! GET  /                                - Store overview
//!
//! # Products
//! GET  /products                        - Product table
//! GET  /products/new                    - New product form
//! POST /products                        - Create product
//! GET  /products/{id}/edit              - Edit product form
//! POST /products/{id}                   - Update product
//! POST /products/{id}/delete            - Delete product
//! POST /products/{id}/toggle-active     - Show or hide on the storefront
//! POST /products/{id}/review            - Approve or reject a seller listing
//!
//! # Categories
//! GET  /categories                      - Category cards
//! GET  /categories/new                  - New category form
//! POST /categories                      - Create category
//! GET  /categories/{id}/edit            - Edit category form
//! POST /categories/{id}                 - Update category
//! POST /categories/{id}/delete          - Delete category
//!
//! # Orders
//! GET  /orders                          - Order table
//! GET  /orders/{id}                     - Order detail
//! POST /orders/{id}/status              - Change order status
//!
//! # Banners
//! GET  /banners                         - Banner list
//! GET  /banners/new                     - New banner form
//! POST /banners                         - Create banner
//! GET  /banners/{id}/edit               - Edit banner form
//! POST /banners/{id}                    - Update banner
//! POST /banners/{id}/delete             - Delete banner
//! ```

pub mod auth;
pub mod banners;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Dashboard
        .route("/", get(dashboard::dashboard))
        // Products
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new_product))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::delete))
        .route("/products/{id}/toggle-active", post(products::toggle_active))
        .route("/products/{id}/review", post(products::review))
        // Categories
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/new", get(categories::new_category))
        .route("/categories/{id}", post(categories::update))
        .route("/categories/{id}/edit", get(categories::edit))
        .route("/categories/{id}/delete", post(categories::delete))
        // Orders
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        // Banners
        .route("/banners", get(banners::index).post(banners::create))
        .route("/banners/new", get(banners::new_banner))
        .route("/banners/{id}", post(banners::update))
        .route("/banners/{id}/edit", get(banners::edit))
        .route("/banners/{id}/delete", post(banners::delete))
}
