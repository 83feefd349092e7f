//! LUXE Core - Shared domain types.
//!
//! This crate provides the types used across all LUXE components:
//! - `storefront` - Public-facing marketplace site
//! - `admin` - Back-office console for catalog and order management
//! - `cli` - Operator tooling (seeding, role management)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Everything that talks to the hosted backend lives in
//! `luxe-backend`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and statuses
//! - [`cart`] - The shopping cart store
//! - [`slug`] - URL slug helpers
//! - [`forms`] - Parsing of submitted form fields into validated drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod forms;
pub mod slug;
pub mod types;

pub use cart::{Cart, CartItem};
pub use forms::FormError;
pub use types::*;
