//! Parsing of submitted HTML forms into validated drafts.
//!
//! Each `*Form` type mirrors the fields posted by a page and deserializes
//! straight from `application/x-www-form-urlencoded`. Calling `parse()`
//! trims, validates, and fills in defaults, producing a draft that the
//! backend layer turns into an insert or update payload.

use serde::Deserialize;

use crate::slug::slugify;
use crate::types::{CategoryId, Price, PriceError};

/// A field failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FormError {
    pub field: &'static str,
    pub message: String,
}

impl FormError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn price(field: &'static str, err: &PriceError) -> Self {
        Self::new(field, err.to_string())
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn category(value: Option<&str>) -> Result<Option<CategoryId>, FormError> {
    optional(value)
        .map(|raw| {
            raw.parse()
                .map_err(|_| FormError::new("category_id", "is not a valid category"))
        })
        .transpose()
}

/// Lenient integer parse: blank or invalid input becomes zero.
fn int_or_zero(value: Option<&str>) -> i32 {
    value
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(0)
}

// =============================================================================
// Admin product form
// =============================================================================

/// Admin product form as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: String,
    pub discount_price: Option<String>,
    pub stock: Option<String>,
    pub is_active: Option<String>,
    pub is_featured: Option<String>,
    pub category_id: Option<String>,
    /// Comma-separated image URLs.
    pub images: Option<String>,
}

/// Validated admin product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
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

impl ProductForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or price is missing or a price or
    /// category id is malformed.
    pub fn parse(&self) -> Result<ProductDraft, FormError> {
        let name = required("name", &self.name)?;
        let slug = optional(self.slug.as_deref()).unwrap_or_else(|| slugify(&name));
        let images: Vec<String> = self
            .images
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(ProductDraft {
            slug,
            description: optional(self.description.as_deref()),
            price: Price::parse_required(&self.price).map_err(|e| FormError::price("price", &e))?,
            discount_price: Price::parse_optional(self.discount_price.as_deref().unwrap_or_default())
                .map_err(|e| FormError::price("discount_price", &e))?,
            stock: int_or_zero(self.stock.as_deref()),
            is_active: self.is_active.is_some(),
            is_featured: self.is_featured.is_some(),
            category_id: category(self.category_id.as_deref())?,
            images: (!images.is_empty()).then_some(images),
            name,
        })
    }
}

// =============================================================================
// Seller submission form
// =============================================================================

/// Seller submission form.
///
/// Image URLs arrive as repeated `images` fields, which
/// `serde_urlencoded` cannot collect into a struct, so this form is built
/// from the raw key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct SellerForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub discount_price: String,
    pub stock: String,
    pub category_id: String,
    pub images: Vec<String>,
}

/// Validated seller submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub discount_price: Option<Price>,
    pub stock: i32,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
}

impl SellerForm {
    /// Collect the form from posted pairs. Unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "description" => form.description = value,
                "price" => form.price = value,
                "discount_price" => form.discount_price = value,
                "stock" => form.stock = value,
                "category_id" => form.category_id = value,
                "images" => form.images.push(value),
                _ => {}
            }
        }
        form
    }

    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the name, price, or stock is missing or invalid.
    pub fn parse(&self) -> Result<SellerDraft, FormError> {
        let name = required("name", &self.name)?;
        let stock = self
            .stock
            .trim()
            .parse::<i32>()
            .map_err(|_| FormError::new("stock", "must be a whole number"))?;
        if stock < 1 {
            return Err(FormError::new("stock", "must be at least 1"));
        }

        Ok(SellerDraft {
            name,
            description: self.description.trim().to_string(),
            price: Price::parse_required(&self.price).map_err(|e| FormError::price("price", &e))?,
            discount_price: Price::parse_optional(&self.discount_price)
                .map_err(|e| FormError::price("discount_price", &e))?,
            stock,
            category_id: category(Some(&self.category_id))?,
            images: self
                .images
                .iter()
                .map(|url| url.trim())
                .filter(|url| !url.is_empty())
                .map(ToString::to_string)
                .collect(),
        })
    }
}

// =============================================================================
// Category form
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl CategoryForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn parse(&self) -> Result<CategoryDraft, FormError> {
        let name = required("name", &self.name)?;
        Ok(CategoryDraft {
            slug: optional(self.slug.as_deref()).unwrap_or_else(|| slugify(&name)),
            description: optional(self.description.as_deref()),
            image_url: optional(self.image_url.as_deref()),
            is_active: self.is_active.is_some(),
            name,
        })
    }
}

// =============================================================================
// Banner form
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BannerForm {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: Option<String>,
    pub display_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

impl BannerForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the title or image URL is blank.
    pub fn parse(&self) -> Result<BannerDraft, FormError> {
        Ok(BannerDraft {
            title: required("title", &self.title)?,
            subtitle: optional(self.subtitle.as_deref()),
            image_url: required("image_url", &self.image_url)?,
            link_url: optional(self.link_url.as_deref()),
            is_active: self.is_active.is_some(),
            display_order: int_or_zero(self.display_order.as_deref()),
        })
    }
}

// =============================================================================
// Checkout form
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDraft {
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the shipping address is blank.
    pub fn parse(&self) -> Result<CheckoutDraft, FormError> {
        Ok(CheckoutDraft {
            shipping_address: required("shipping_address", &self.shipping_address)?,
            shipping_city: required("shipping_city", &self.shipping_city)?,
            shipping_country: required("shipping_country", &self.shipping_country)?,
            phone: optional(self.phone.as_deref()),
            notes: optional(self.notes.as_deref()),
        })
    }
}
