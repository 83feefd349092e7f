//! Checkout route handlers.
//!
//! Checkout requires a signed-in user and a non-empty cart. The order and
//! its lines are written with the user's own token, so the backend records
//! them against that user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::rows::{NewOrder, OrderRow};
use luxe_backend::tables::OrderRepository;
use luxe_core::forms::CheckoutForm;
use luxe_core::{Cart, OrderId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::session::{load_cart, save_cart};
use crate::models::{Flash, PageContext};
use crate::state::AppState;

/// Checkout form page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub cart: Cart,
    pub form: CheckoutForm,
    pub error: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub page: PageContext,
    pub order: OrderRow,
}

/// Display the checkout form.
#[instrument(skip_all)]
pub async fn show(
    RequireAuth(_user): RequireAuth,
    session: Session,
    page: PageContext,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        Flash::error("Your cart is empty").set(&session).await;
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(CheckoutTemplate {
        page,
        cart,
        form: CheckoutForm::default(),
        error: None,
    }
    .into_response())
}

/// Place the order.
///
/// Inserts the order (status pending, total = cart total), then one line
/// per cart item priced at its effective unit price, then empties the cart.
#[instrument(skip_all, fields(user_id = %user.user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        Flash::error("Your cart is empty").set(&session).await;
        return Ok(Redirect::to("/cart").into_response());
    }

    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutTemplate {
                    page,
                    cart,
                    form,
                    error: Some(e.to_string()),
                },
            )
                .into_response());
        }
    };

    let order = NewOrder::new(draft, user.user.id, cart.total_price());
    let placed = match OrderRepository::new(state.backend(), Some(&user.access_token))
        .place(&order, &cart)
        .await
    {
        Ok(placed) => placed,
        Err(e) => {
            tracing::error!("Failed to place order: {e}");
            return Ok((
                StatusCode::BAD_GATEWAY,
                CheckoutTemplate {
                    page,
                    cart,
                    form,
                    error: Some(format!("Failed to place order: {}", e.user_message())),
                },
            )
                .into_response());
        }
    };

    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(order_id = %placed.id, total = %placed.total_amount, "Order placed");
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", &placed.id.to_string())]),
    );
    Flash::success("Order placed successfully!").set(&session).await;

    Ok(Redirect::to(&format!("/checkout/confirmation/{}", placed.id)).into_response())
}

/// Display the confirmation for one of the user's orders.
#[instrument(skip(state, user, page))]
pub async fn confirmation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Path(id): Path<OrderId>,
) -> Result<ConfirmationTemplate> {
    let order = OrderRepository::new(state.backend(), Some(&user.access_token))
        .for_user(id, user.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(ConfirmationTemplate { page, order })
}
