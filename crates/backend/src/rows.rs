//! Row shapes of the hosted tables, and the payloads written to them.
//!
//! Reads deserialize into `*Row` types. Writes serialize from payload types
//! built out of the validated core drafts, so a handler never hand-assembles
//! JSON.

use chrono::{DateTime, Utc};
use luxe_core::forms::{BannerDraft, CategoryDraft, CheckoutDraft, ProductDraft, SellerDraft};
use luxe_core::{
    BannerId, CartItem, CategoryId, OrderId, OrderItemId, OrderStatus, Price, ProductId,
    ProductStatus, UserId,
};
use serde::{Deserialize, Serialize};

/// Image shown when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

// =============================================================================
// Products
// =============================================================================

/// Category embedded in a product read (`categories(name, slug)`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmbeddedCategory {
    pub name: String,
    pub slug: String,
}

/// A `products` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Price,
    pub discount_price: Option<Price>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub category_id: Option<CategoryId>,
    pub images: Option<Vec<String>>,
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Option<EmbeddedCategory>,
}

impl ProductRow {
    /// First image URL, or the placeholder.
    #[must_use]
    pub fn first_image(&self) -> &str {
        self.images
            .as_deref()
            .and_then(<[String]>::first)
            .map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// All image URLs (possibly empty).
    #[must_use]
    pub fn image_list(&self) -> &[String] {
        self.images.as_deref().unwrap_or_default()
    }

    /// Price the customer pays.
    #[must_use]
    pub fn display_price(&self) -> Price {
        self.price.with_discount(self.discount_price)
    }

    /// Whether a discount below the list price is set (shows the SALE tag).
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.display_price() < self.price
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Name of the embedded category, if loaded.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.categories.as_ref().map(|c| c.name.as_str())
    }

    /// Whether the embedded category has the given slug.
    #[must_use]
    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.as_ref().is_some_and(|c| c.slug == slug)
    }

    /// Cart line for one unit of this product.
    #[must_use]
    pub fn to_cart_item(&self) -> CartItem {
        CartItem {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            discount_price: self.discount_price,
            image: self.first_image().to_string(),
            quantity: 1,
        }
    }
}

/// Admin product insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Price,
    pub discount_price: Option<Price>,
    pub stock: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub category_id: Option<CategoryId>,
    pub images: Option<Vec<String>>,
}

/// Admin product update; the same fields as an insert.
pub type ProductPatch = NewProduct;

impl From<ProductDraft> for NewProduct {
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: draft.name,
            slug: draft.slug,
            description: draft.description,
            price: draft.price,
            discount_price: draft.discount_price,
            stock: draft.stock,
            is_active: draft.is_active,
            is_featured: draft.is_featured,
            category_id: draft.category_id,
            images: draft.images,
        }
    }
}

/// Seller submission insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewSellerProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub discount_price: Option<Price>,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
    pub user_id: UserId,
    pub status: ProductStatus,
    pub is_active: bool,
    pub is_featured: bool,
}

impl NewSellerProduct {
    /// Build a pending submission owned by `user_id`.
    #[must_use]
    pub fn new(draft: SellerDraft, user_id: UserId, created_millis: i64) -> Self {
        Self {
            slug: luxe_core::slug::seller_slug(&draft.name, created_millis),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            discount_price: draft.discount_price,
            stock: draft.stock,
            category_id: draft.category_id,
            images: draft.images,
            user_id,
            status: ProductStatus::Pending,
            is_active: true,
            is_featured: false,
        }
    }
}

/// Seller edit. Any change sends the product back to review.
#[derive(Debug, Clone, Serialize)]
pub struct SellerProductPatch {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub discount_price: Option<Price>,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
    pub status: ProductStatus,
}

impl From<SellerDraft> for SellerProductPatch {
    fn from(draft: SellerDraft) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            price: draft.price,
            discount_price: draft.discount_price,
            stock: draft.stock,
            category_id: draft.category_id,
            images: draft.images,
            status: ProductStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivePatch {
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReviewPatch {
    pub status: ProductStatus,
}

// =============================================================================
// Categories
// =============================================================================

/// A `categories` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Category insert or update.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl From<CategoryDraft> for CategoryPayload {
    fn from(draft: CategoryDraft) -> Self {
        Self {
            name: draft.name,
            slug: draft.slug,
            description: draft.description,
            image_url: draft.image_url,
            is_active: draft.is_active,
        }
    }
}

// =============================================================================
// Banners
// =============================================================================

/// A `banners` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BannerRow {
    pub id: BannerId,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Banner insert or update.
#[derive(Debug, Clone, Serialize)]
pub struct BannerPayload {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

impl From<BannerDraft> for BannerPayload {
    fn from(draft: BannerDraft) -> Self {
        Self {
            title: draft.title,
            subtitle: draft.subtitle,
            image_url: draft.image_url,
            link_url: draft.link_url,
            is_active: draft.is_active,
            display_order: draft.display_order,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An `order_items` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price at the time of purchase.
    pub price: Price,
}

impl OrderItemRow {
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(u32::try_from(self.quantity).unwrap_or(0))
    }
}

/// An `orders` row, optionally with its embedded items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_country: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}

impl OrderRow {
    /// Number of units across all embedded items.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.order_items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

/// Order insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewOrder {
    #[must_use]
    pub fn new(draft: CheckoutDraft, user_id: UserId, total_amount: Price) -> Self {
        Self {
            user_id,
            total_amount,
            status: OrderStatus::Pending,
            shipping_address: draft.shipping_address,
            shipping_city: draft.shipping_city,
            shipping_country: draft.shipping_country,
            phone: draft.phone,
            notes: draft.notes,
        }
    }
}

/// Order item insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
}

impl NewOrderItem {
    /// Line for a cart item, priced at its effective unit price.
    #[must_use]
    pub fn from_cart(order_id: OrderId, item: &CartItem) -> Self {
        Self {
            order_id,
            product_id: item.id,
            product_name: item.name.clone(),
            quantity: item.quantity,
            price: item.unit_price(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusPatch {
    pub status: OrderStatus,
}

// =============================================================================
// Roles
// =============================================================================

/// A `user_roles` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleRow {
    pub user_id: UserId,
    pub role: luxe_core::AppRole,
}
