//! Client for the LUXE hosted backend.
//!
//! # Architecture
//!
//! - The hosted backend is the source of truth - NO local database, direct API calls
//! - Tables are reached through a PostgREST-style REST interface (`/rest/v1`)
//! - Authentication goes through a GoTrue-style auth API (`/auth/v1`)
//! - Every request carries the caller's access token so row-level security
//!   applies to the signed-in user; anonymous calls use the anon key
//! - Hot storefront reads are memoised in [`CatalogCache`] (moka, 60 s TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use luxe_backend::{BackendClient, tables::ProductRepository};
//!
//! let client = BackendClient::new(&config)?;
//! let featured = ProductRepository::new(&client, None).featured(8).await?;
//!
//! let orders: Vec<OrderRow> = client
//!     .from("orders")
//!     .select("*, order_items(*)")
//!     .order("created_at", false)
//!     .with_token(&session_token)
//!     .fetch()
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod rows;
pub mod tables;

pub use auth::{AuthSession, AuthUser, SignUpOutcome};
pub use cache::CatalogCache;
pub use client::BackendClient;
pub use config::BackendConfig;
pub use error::BackendError;
pub use query::TableQuery;
