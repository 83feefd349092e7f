//! Home page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use luxe_backend::rows::{BannerRow, CategoryRow, ProductRow};
use luxe_backend::tables::{BannerRepository, CategoryRepository, ProductRepository};
use tracing::instrument;

use crate::filters;
use crate::models::PageContext;
use crate::state::AppState;

/// Featured products shown on the home page.
pub const FEATURED_LIMIT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub banners: Arc<Vec<BannerRow>>,
    pub categories: Arc<Vec<CategoryRow>>,
    pub featured: Arc<Vec<ProductRow>>,
}

/// Display the home page.
///
/// Each section is loaded independently through the catalog cache; a
/// section whose query fails is logged and rendered empty.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> HomeTemplate {
    let backend = state.backend();
    let catalog = state.catalog();
    let banner_repo = BannerRepository::new(backend, None);
    let category_repo = CategoryRepository::new(backend, None);
    let product_repo = ProductRepository::new(backend, None);

    let (banners, categories, featured) = tokio::join!(
        catalog.banners(banner_repo.active()),
        catalog.categories(category_repo.active()),
        catalog.featured(FEATURED_LIMIT, product_repo.featured(FEATURED_LIMIT)),
    );

    HomeTemplate {
        page,
        banners: banners.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch banners: {e}");
            Arc::default()
        }),
        categories: categories.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch categories: {e}");
            Arc::default()
        }),
        featured: featured.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Arc::default()
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Flash;

    #[test]
    fn test_empty_home_still_renders_hero_and_promo() {
        let html = HomeTemplate {
            page: PageContext {
                flash: Some(Flash::success("Welcome back!")),
                ..PageContext::default()
            },
            banners: Arc::default(),
            categories: Arc::default(),
            featured: Arc::default(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Discover Premium Style"));
        assert!(html.contains("Free Shipping"));
        assert!(html.contains("Welcome back!"));
        assert!(!html.contains("Shop by Category"));
    }
}
