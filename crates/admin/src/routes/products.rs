//! Product management route handlers.
//!
//! Admins see every product, seller submissions included, and are the only
//! ones who can approve a listing, feature it, or hide it.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::rows::{CategoryRow, NewProduct, ProductRow};
use luxe_backend::tables::{CategoryRepository, ProductRepository};
use luxe_core::forms::ProductForm;
use luxe_core::{ProductId, ProductStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminPage, CurrentAdmin, Flash};
use crate::state::AppState;

/// Product table template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: AdminPage,
    pub products: Vec<ProductRow>,
}

/// Create / edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub page: AdminPage,
    pub categories: Arc<Vec<CategoryRow>>,
    pub form: ProductForm,
    /// `None` when creating.
    pub product_id: Option<ProductId>,
}

/// Review decision form.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub status: ProductStatus,
}

/// Prefill the form from a stored product.
fn form_from_product(product: &ProductRow) -> ProductForm {
    let images = product.image_list().join(", ");
    ProductForm {
        name: product.name.clone(),
        slug: Some(product.slug.clone()),
        description: product.description.clone(),
        price: product.price.amount().to_string(),
        discount_price: product.discount_price.map(|p| p.amount().to_string()),
        stock: Some(product.stock.to_string()),
        is_active: product.is_active.then(|| "on".to_string()),
        is_featured: product.is_featured.then(|| "on".to_string()),
        category_id: product.category_id.map(|id| id.to_string()),
        images: (!images.is_empty()).then_some(images),
    }
}

/// Active categories for the dropdown; empty if they cannot be loaded.
async fn categories(state: &AppState, admin: &CurrentAdmin) -> Arc<Vec<CategoryRow>> {
    let repo = CategoryRepository::new(state.backend(), Some(admin.token()));
    state
        .catalog()
        .categories(repo.active())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to load categories for product form: {e}");
            Arc::default()
        })
}

/// Re-render the form with an error, keeping what was entered.
async fn form_error(
    state: &AppState,
    admin: &CurrentAdmin,
    mut page: AdminPage,
    form: ProductForm,
    product_id: Option<ProductId>,
    status: StatusCode,
    message: String,
) -> Response {
    page.flash = Some(Flash::error(message));
    (
        status,
        ProductFormTemplate {
            page,
            categories: categories(state, admin).await,
            form,
            product_id,
        },
    )
        .into_response()
}

/// List every product, newest first.
///
/// GET /products
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.backend(), Some(admin.token()))
        .list_all()
        .await?;
    Ok(ProductsIndexTemplate { page, products })
}

/// New product form. New products start out active.
///
/// GET /products/new
pub async fn new_product(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
) -> ProductFormTemplate {
    ProductFormTemplate {
        page,
        categories: categories(&state, &admin).await,
        form: ProductForm {
            is_active: Some("on".to_string()),
            ..ProductForm::default()
        },
        product_id: None,
    }
}

/// Create a product.
///
/// POST /products
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    page: AdminPage,
    Form(form): Form<ProductForm>,
) -> Response {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return form_error(
                &state,
                &admin,
                page,
                form,
                None,
                StatusCode::UNPROCESSABLE_ENTITY,
                e.to_string(),
            )
            .await;
        }
    };

    let product = NewProduct::from(draft);
    match ProductRepository::new(state.backend(), Some(admin.token()))
        .create(&product)
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            tracing::info!(slug = %product.slug, "Product created");
            Flash::success("Product created successfully").set(&session).await;
            Redirect::to("/products").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to create product: {e}");
            form_error(
                &state,
                &admin,
                page,
                form,
                None,
                StatusCode::BAD_GATEWAY,
                format!("Failed to create product: {}", e.user_message()),
            )
            .await
        }
    }
}

/// Edit form.
///
/// GET /products/{id}/edit
#[instrument(skip(state, admin, page))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
    Path(id): Path<ProductId>,
) -> Result<ProductFormTemplate> {
    let product = ProductRepository::new(state.backend(), Some(admin.token()))
        .get(id)
        .await?;

    Ok(ProductFormTemplate {
        page,
        categories: categories(&state, &admin).await,
        form: form_from_product(&product),
        product_id: Some(id),
    })
}

/// Update a product.
///
/// POST /products/{id}
#[instrument(skip(state, admin, session, page, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    page: AdminPage,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Response {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return form_error(
                &state,
                &admin,
                page,
                form,
                Some(id),
                StatusCode::UNPROCESSABLE_ENTITY,
                e.to_string(),
            )
            .await;
        }
    };

    match ProductRepository::new(state.backend(), Some(admin.token()))
        .update(id, &NewProduct::from(draft))
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Product updated successfully").set(&session).await;
            Redirect::to("/products").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to update product: {e}");
            form_error(
                &state,
                &admin,
                page,
                form,
                Some(id),
                StatusCode::BAD_GATEWAY,
                format!("Failed to update product: {}", e.user_message()),
            )
            .await
        }
    }
}

/// Delete a product. Its order lines keep their name and price.
///
/// POST /products/{id}/delete
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<ProductId>,
) -> Redirect {
    match ProductRepository::new(state.backend(), Some(admin.token()))
        .delete(id)
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Product deleted").set(&session).await;
        }
        Err(e) => {
            tracing::warn!("Failed to delete product: {e}");
            Flash::error(format!("Failed to delete product: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }
    Redirect::to("/products")
}

/// Show or hide a product on the storefront.
///
/// POST /products/{id}/toggle-active
#[instrument(skip(state, admin, session))]
pub async fn toggle_active(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<ProductId>,
) -> Redirect {
    let repo = ProductRepository::new(state.backend(), Some(admin.token()));
    let result = match repo.get(id).await {
        Ok(product) => repo.set_active(id, !product.is_active).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            state.catalog().invalidate_all();
            Flash::success("Product status updated").set(&session).await;
        }
        Err(e) => {
            tracing::warn!("Failed to toggle product: {e}");
            Flash::error(format!("Failed to update product: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }
    Redirect::to("/products")
}

/// Approve or reject a listing.
///
/// POST /products/{id}/review
#[instrument(skip(state, admin, session))]
pub async fn review(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<ReviewForm>,
) -> Redirect {
    if form.status == ProductStatus::Pending {
        Flash::error("A listing can only be approved or rejected")
            .set(&session)
            .await;
        return Redirect::to("/products");
    }

    match ProductRepository::new(state.backend(), Some(admin.token()))
        .set_review_status(id, form.status)
        .await
    {
        Ok(()) => {
            state.catalog().invalidate_all();
            tracing::info!(product_id = %id, status = %form.status, "Listing reviewed");
            Flash::success(format!("Product marked {}", form.status.label()))
                .set(&session)
                .await;
        }
        Err(e) => {
            tracing::warn!("Failed to review product: {e}");
            Flash::error(format!("Failed to update product: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }
    Redirect::to("/products")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use chrono::TimeZone;
    use luxe_backend::rows::EmbeddedCategory;
    use luxe_core::{CategoryId, Price};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::test_support;

    fn product(status: ProductStatus) -> ProductRow {
        ProductRow {
            id: ProductId::new(Uuid::from_u128(1)),
            name: "Walnut Desk Organizer".to_string(),
            slug: "walnut-desk-organizer".to_string(),
            description: Some("Hand-finished walnut".to_string()),
            price: Price::from_cents(8900),
            discount_price: Some(Price::from_cents(7500)),
            stock: 14,
            is_active: true,
            is_featured: true,
            category_id: Some(CategoryId::new(Uuid::from_u128(2))),
            images: Some(vec![
                "https://cdn.luxe.test/a.jpg".to_string(),
                "https://cdn.luxe.test/b.jpg".to_string(),
            ]),
            user_id: None,
            status,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            categories: Some(EmbeddedCategory {
                name: "Machines".to_string(),
                slug: "machines".to_string(),
            }),
        }
    }

    #[test]
    fn test_form_from_product_round_trips_through_parse() {
        let original = product(ProductStatus::Approved);
        let form = form_from_product(&original);

        assert_eq!(form.price, "89.00");
        assert_eq!(form.discount_price.as_deref(), Some("75.00"));
        assert_eq!(
            form.images.as_deref(),
            Some("https://cdn.luxe.test/a.jpg, https://cdn.luxe.test/b.jpg")
        );

        let draft = form.parse().unwrap();
        assert_eq!(draft.slug, original.slug);
        assert_eq!(draft.price, original.price);
        assert_eq!(draft.images, original.images);
        assert!(draft.is_active && draft.is_featured);
    }

    #[test]
    fn test_product_table_shows_discount_and_review_actions() {
        let html = ProductsIndexTemplate {
            page: AdminPage::new("Ada", "/products", None),
            products: vec![product(ProductStatus::Pending)],
        }
        .render()
        .unwrap();

        assert!(html.contains("Manage your product catalog"));
        assert!(html.contains("Walnut Desk Organizer"));
        assert!(html.contains("Machines"));
        assert!(html.contains("$75.00"));
        assert!(html.contains("$89.00"));
        assert!(html.contains("Pending Review"));
        assert!(html.contains("value=\"approved\""));
        assert!(html.contains("value=\"rejected\""));
    }

    #[test]
    fn test_reviewed_product_has_no_review_buttons() {
        let html = ProductsIndexTemplate {
            page: AdminPage::new("Ada", "/products", None),
            products: vec![product(ProductStatus::Approved)],
        }
        .render()
        .unwrap();
        assert!(!html.contains("value=\"approved\""));
    }

    #[test]
    fn test_empty_product_table() {
        let html = ProductsIndexTemplate {
            page: AdminPage::new("Ada", "/products", None),
            products: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("No products yet"));
    }

    #[test]
    fn test_edit_form_selects_category() {
        let category_id = CategoryId::new(Uuid::from_u128(2));
        let categories = vec![CategoryRow {
            id: category_id,
            name: "Machines".to_string(),
            slug: "machines".to_string(),
            description: None,
            image_url: None,
            is_active: true,
            created_at: None,
        }];

        let html = ProductFormTemplate {
            page: AdminPage::new("Ada", "/products/1/edit", None),
            categories: Arc::new(categories),
            form: form_from_product(&product(ProductStatus::Approved)),
            product_id: Some(ProductId::new(Uuid::from_u128(1))),
        }
        .render()
        .unwrap();

        assert!(html.contains("Edit Product"));
        assert!(html.contains(&format!("action=\"/products/{}\"", Uuid::from_u128(1))));
        assert!(html.contains(&format!("value=\"{category_id}\" selected")));
        assert!(html.contains("value=\"walnut-desk-organizer\""));
    }

    #[test]
    fn test_new_form_posts_to_collection() {
        let html = ProductFormTemplate {
            page: AdminPage::new("Ada", "/products/new", None),
            categories: Arc::default(),
            form: ProductForm::default(),
            product_id: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("Add New Product"));
        assert!(html.contains("action=\"/products\""));
    }

    #[tokio::test]
    async fn test_product_writes_require_admin() {
        let app = crate::app(test_support::state()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/products/{}/delete", Uuid::from_u128(1)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }
}
