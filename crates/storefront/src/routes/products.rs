//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use luxe_backend::rows::ProductRow;
use luxe_backend::tables::ProductRepository;
use luxe_core::slug::category_title;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::PageContext;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
}

impl ListingQuery {
    /// Category slug, ignoring a blank parameter.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn featured_only(&self) -> bool {
        self.featured.as_deref() == Some("true")
    }

    /// Page heading. A category filter names the page even when combined
    /// with `featured=true`.
    #[must_use]
    pub fn heading(&self) -> String {
        match self.category() {
            Some(slug) => category_title(slug),
            None if self.featured_only() => "Featured Products".to_string(),
            None => "All Products".to_string(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub heading: String,
    pub products: Vec<ProductRow>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductRow,
    pub selected_image: String,
}

/// Shown for unknown or inactive products.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
}

/// Detail page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    /// Index into the product's images.
    pub image: Option<usize>,
}

/// Display the product listing.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<ListingQuery>,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.backend(), None)
        .list_active(query.category(), query.featured_only())
        .await?;

    Ok(ProductsIndexTemplate {
        page,
        heading: query.heading(),
        products,
    })
}

/// Display a product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(slug): Path<String>,
    Query(query): Query<ShowQuery>,
) -> Result<Response> {
    let Some(product) = ProductRepository::new(state.backend(), None)
        .active_by_slug(&slug)
        .await?
    else {
        tracing::debug!(slug = %slug, "Product not found or inactive");
        return Ok((StatusCode::NOT_FOUND, ProductNotFoundTemplate { page }).into_response());
    };

    let selected_image = query
        .image
        .and_then(|i| product.image_list().get(i).cloned())
        .unwrap_or_else(|| product.first_image().to_string());

    Ok(ProductShowTemplate {
        page,
        product,
        selected_image,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(category: Option<&str>, featured: Option<&str>) -> ListingQuery {
        ListingQuery {
            category: category.map(String::from),
            featured: featured.map(String::from),
        }
    }

    #[test]
    fn test_heading() {
        assert_eq!(query(None, None).heading(), "All Products");
        assert_eq!(query(None, Some("true")).heading(), "Featured Products");
        assert_eq!(query(Some("writing-tools"), None).heading(), "Writing Tools");
        assert_eq!(query(Some("  "), None).heading(), "All Products");
        assert_eq!(query(Some("ai-robots"), Some("true")).heading(), "Ai Robots");
    }

    #[test]
    fn test_featured_flag_must_be_true() {
        assert!(query(None, Some("true")).featured_only());
        assert!(!query(None, Some("1")).featured_only());
        assert!(!query(None, None).featured_only());
    }

    #[test]
    fn test_empty_listing_renders_empty_state() {
        let html = ProductsIndexTemplate {
            page: PageContext::default(),
            heading: "Shoes".to_string(),
            products: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Shoes"));
        assert!(html.contains("0 products"));
        assert!(html.contains("No products found"));
    }

    #[test]
    fn test_not_found_page() {
        let html = ProductNotFoundTemplate {
            page: PageContext::default(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Product not found"));
    }
}
