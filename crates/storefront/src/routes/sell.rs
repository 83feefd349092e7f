//! Seller dashboard route handlers.
//!
//! Signed-in users submit products for review. A submission is active but
//! pending until an admin approves it; editing resets it to pending.
//! Every write is scoped to the product id AND the signed-in user's id.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::rows::{CategoryRow, NewSellerProduct, ProductRow, SellerProductPatch};
use luxe_backend::tables::{CategoryRepository, ProductRepository};
use luxe_core::ProductId;
use luxe_core::forms::SellerForm;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Flash, PageContext};
use crate::state::AppState;

/// Image URL inputs shown on the submission form.
const MIN_IMAGE_SLOTS: usize = 3;

// =============================================================================
// Templates
// =============================================================================

/// Seller dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "sell/index.html")]
pub struct SellIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductRow>,
}

/// Shown to visitors who are not signed in.
#[derive(Template, WebTemplate)]
#[template(path = "sell/sign_in_required.html")]
pub struct SignInRequiredTemplate {
    pub page: PageContext,
}

/// Submission / edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "sell/form.html")]
pub struct SellFormTemplate {
    pub page: PageContext,
    pub categories: Arc<Vec<CategoryRow>>,
    pub form: SellerForm,
    pub image_slots: Vec<String>,
    /// Set when editing an existing product.
    pub product_id: Option<ProductId>,
    pub error: Option<String>,
}

impl SellFormTemplate {
    fn new(
        page: PageContext,
        categories: Arc<Vec<CategoryRow>>,
        form: SellerForm,
        product_id: Option<ProductId>,
        error: Option<String>,
    ) -> Self {
        let mut image_slots = form.images.clone();
        if image_slots.len() < MIN_IMAGE_SLOTS {
            image_slots.resize(MIN_IMAGE_SLOTS, String::new());
        }
        Self {
            page,
            categories,
            form,
            image_slots,
            product_id,
            error,
        }
    }
}

/// Pre-fill the form from a stored product.
fn form_from_product(product: &ProductRow) -> SellerForm {
    SellerForm {
        name: product.name.clone(),
        description: product.description.clone().unwrap_or_default(),
        price: product.price.amount().to_string(),
        discount_price: product
            .discount_price
            .map(|p| p.amount().to_string())
            .unwrap_or_default(),
        stock: product.stock.to_string(),
        category_id: product
            .category_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        images: product.image_list().to_vec(),
    }
}

/// Active categories through the catalog cache; empty on failure.
async fn categories(state: &AppState) -> Arc<Vec<CategoryRow>> {
    let repo = CategoryRepository::new(state.backend(), None);
    state
        .catalog()
        .categories(repo.active())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch categories: {e}");
            Arc::default()
        })
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the seller's products, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    page: PageContext,
) -> Result<Response> {
    let Some(user) = user else {
        return Ok(SignInRequiredTemplate { page }.into_response());
    };

    let products = ProductRepository::new(state.backend(), Some(&user.access_token))
        .by_seller(user.user.id)
        .await?;

    Ok(SellIndexTemplate { page, products }.into_response())
}

/// Display the submission form.
#[instrument(skip_all)]
pub async fn new_product(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    page: PageContext,
) -> SellFormTemplate {
    SellFormTemplate::new(page, categories(&state).await, SellerForm::default(), None, None)
}

/// Submit a product for review.
///
/// Image URLs arrive as repeated `images` fields, so the body is read as
/// raw pairs.
#[instrument(skip_all, fields(user_id = %user.user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = SellerForm::from_pairs(pairs);
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            let categories = categories(&state).await;
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                SellFormTemplate::new(page, categories, form, None, Some(e.to_string())),
            )
                .into_response();
        }
    };

    let product = NewSellerProduct::new(
        draft,
        user.user.id,
        chrono::Utc::now().timestamp_millis(),
    );

    match ProductRepository::new(state.backend(), Some(&user.access_token))
        .submit(&product)
        .await
    {
        Ok(()) => {
            tracing::info!(slug = %product.slug, "Product submitted for review");
            add_breadcrumb("sell", "Product submitted", Some(&[("slug", &product.slug)]));
            Flash::success("Product submitted for review!").set(&session).await;
            Redirect::to("/sell").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to submit product: {e}");
            Flash::error(format!("Failed to submit product: {}", e.user_message()))
                .set(&session)
                .await;
            Redirect::to("/sell/new").into_response()
        }
    }
}

/// Display the edit form for one of the seller's products.
#[instrument(skip(state, user, session, page))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    let product = ProductRepository::new(state.backend(), Some(&user.access_token))
        .owned(id, user.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    if !product.status.is_editable_by_seller() {
        Flash::error("Approved products can no longer be edited")
            .set(&session)
            .await;
        return Ok(Redirect::to("/sell").into_response());
    }

    let form = form_from_product(&product);
    Ok(SellFormTemplate::new(page, categories(&state).await, form, Some(id), None).into_response())
}

/// Update a product and send it back for review.
#[instrument(skip(state, user, session, page, pairs), fields(user_id = %user.user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Path(id): Path<ProductId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.backend(), Some(&user.access_token));

    let existing = repo
        .owned(id, user.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    if !existing.status.is_editable_by_seller() {
        Flash::error("Approved products can no longer be edited")
            .set(&session)
            .await;
        return Ok(Redirect::to("/sell").into_response());
    }

    let form = SellerForm::from_pairs(pairs);
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            let categories = categories(&state).await;
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                SellFormTemplate::new(page, categories, form, Some(id), Some(e.to_string())),
            )
                .into_response());
        }
    };

    match repo
        .update_owned(id, user.user.id, &SellerProductPatch::from(draft))
        .await
    {
        Ok(true) => {
            tracing::info!(product_id = %id, "Product updated and resubmitted");
            Flash::success("Product updated and resubmitted for review!")
                .set(&session)
                .await;
        }
        Ok(false) => return Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            Flash::error(format!("Failed to update product: {}", e.user_message()))
                .set(&session)
                .await;
            return Ok(Redirect::to(&format!("/sell/{id}/edit")).into_response());
        }
    }

    Ok(Redirect::to("/sell").into_response())
}

/// Delete one of the seller's products.
#[instrument(skip(state, user, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<ProductId>,
) -> Redirect {
    match ProductRepository::new(state.backend(), Some(&user.access_token))
        .delete_owned(id, user.user.id)
        .await
    {
        Ok(true) => {
            tracing::info!(product_id = %id, "Seller deleted product");
            Flash::success("Product deleted!").set(&session).await;
        }
        Ok(false) => {
            Flash::error("Product not found").set(&session).await;
        }
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            Flash::error(format!("Failed to delete product: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }
    Redirect::to("/sell")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use chrono::TimeZone;
    use luxe_core::{CategoryId, Price, ProductStatus, UserId};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::test_support;

    fn product(status: ProductStatus) -> ProductRow {
        ProductRow {
            id: ProductId::new(Uuid::from_u128(1)),
            name: "Fountain Pen".to_string(),
            slug: "fountain-pen-1700000000000".to_string(),
            description: Some("Smooth nib".to_string()),
            price: Price::from_cents(4500),
            discount_price: Some(Price::from_cents(3900)),
            stock: 12,
            is_active: true,
            is_featured: false,
            category_id: Some(CategoryId::new(Uuid::from_u128(4))),
            images: Some(vec!["https://img.example/pen.jpg".to_string()]),
            user_id: Some(UserId::new(Uuid::from_u128(7))),
            status,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            categories: None,
        }
    }

    #[test]
    fn test_dashboard_badges_and_edit_links() {
        let html = SellIndexTemplate {
            page: PageContext::default(),
            products: vec![product(ProductStatus::Pending), {
                let mut p = product(ProductStatus::Approved);
                p.id = ProductId::new(Uuid::from_u128(2));
                p
            }],
        }
        .render()
        .unwrap();

        assert!(html.contains("How it works"));
        assert!(html.contains("My Products"));
        assert!(html.contains("Pending Review"));
        assert!(html.contains("Approved"));
        assert!(html.contains(&format!("/sell/{}/edit", Uuid::from_u128(1))));
        assert!(!html.contains(&format!("/sell/{}/edit", Uuid::from_u128(2))));
    }

    #[test]
    fn test_sign_in_required_page() {
        let html = SignInRequiredTemplate {
            page: PageContext::default(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Sign In Required"));
        assert!(html.contains("href=\"/auth\""));
    }

    #[test]
    fn test_edit_form_prefilled_from_product() {
        let p = product(ProductStatus::Rejected);
        let form = form_from_product(&p);
        assert_eq!(form.price, "45.00");
        assert_eq!(form.discount_price, "39.00");
        assert_eq!(form.stock, "12");
        assert_eq!(form.category_id, Uuid::from_u128(4).to_string());

        let template = SellFormTemplate::new(
            PageContext::default(),
            Arc::default(),
            form,
            Some(p.id),
            None,
        );
        assert_eq!(template.image_slots.len(), MIN_IMAGE_SLOTS);
        let html = template.render().unwrap();
        assert!(html.contains(&format!("action=\"/sell/{}\"", p.id)));
        assert!(html.contains("Edit Product"));
        assert!(html.contains("Fountain Pen"));
        assert!(html.contains("https://img.example/pen.jpg"));
    }

    #[test]
    fn test_new_form_posts_to_sell() {
        let template = SellFormTemplate::new(
            PageContext::default(),
            Arc::default(),
            SellerForm::default(),
            None,
            Some("name: is required".to_string()),
        );
        let html = template.render().unwrap();
        assert!(html.contains("action=\"/sell\""));
        assert!(html.contains("Submit for Review"));
        assert!(html.contains("name: is required"));
    }

    #[tokio::test]
    async fn test_sell_without_sign_in_shows_prompt() {
        let app = crate::app(test_support::state()).unwrap();
        let response = app
            .oneshot(Request::builder().uri("/sell").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_submit_without_sign_in_redirects_to_auth() {
        let app = crate::app(test_support::state()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sell")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("name=Pen&price=10&stock=1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth");
    }
}
