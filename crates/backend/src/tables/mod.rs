//! Repositories over the hosted tables.
//!
//! Each repository borrows the shared [`BackendClient`] and, optionally, the
//! caller's access token. With a token every request runs as that user and
//! row-level security decides what they can see and change; without one the
//! client key is used.
//!
//! ## Tables
//!
//! - `products` - Catalog and seller submissions (review status per row)
//! - `categories` - Product categories
//! - `banners` - Home page hero banners
//! - `orders` / `order_items` - Placed orders and their lines
//! - `user_roles` - Admin role assignments
//!
//! [`BackendClient`]: crate::BackendClient

mod banners;
mod categories;
mod orders;
mod products;
mod roles;

pub use banners::BannerRepository;
pub use categories::CategoryRepository;
pub use orders::{DashboardStats, OrderRepository};
pub use products::ProductRepository;
pub use roles::RoleRepository;

pub(crate) const PRODUCTS: &str = "products";
pub(crate) const CATEGORIES: &str = "categories";
pub(crate) const BANNERS: &str = "banners";
pub(crate) const ORDERS: &str = "orders";
pub(crate) const ORDER_ITEMS: &str = "order_items";
pub(crate) const USER_ROLES: &str = "user_roles";

/// Product columns plus the embedded category.
pub(crate) const PRODUCT_WITH_CATEGORY: &str = "*, categories(name, slug)";
