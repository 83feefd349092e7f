//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation is a plain form
//! post that redirects back, leaving a flash message where useful.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use luxe_backend::tables::ProductRepository;
use luxe_core::{Cart, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session::{load_cart, save_cart};
use crate::models::{Flash, PageContext};
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: Cart,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add to cart form.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Page to return to, e.g. the product page the button was on.
    pub return_to: Option<String>,
}

/// Update quantity form.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart form.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

const RETURN_BASE: &str = "http://luxe.invalid/";

/// Only same-site paths are followed after adding to the cart.
///
/// The path is resolved the way a browser would (so `/\host` and `//host`
/// both name another host) and kept only if it stays on the same origin.
fn safe_return_path(return_to: Option<&str>) -> &str {
    let Some(path) = return_to.filter(|p| p.starts_with('/')) else {
        return "/cart";
    };
    let same_origin = Url::parse(RETURN_BASE)
        .and_then(|base| base.join(path))
        .is_ok_and(|resolved| resolved.host_str() == Some("luxe.invalid"));
    if same_origin { path } else { "/cart" }
}

/// Display the cart page.
#[instrument(skip(session, page))]
pub async fn show(session: Session, page: PageContext) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;
    Ok(CartShowTemplate { page, cart })
}

/// Add one unit of an active product.
///
/// The product is looked up so the cart captures its current name, price,
/// and first image.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let redirect_to = safe_return_path(form.return_to.as_deref()).to_string();

    let product = match ProductRepository::new(state.backend(), None)
        .active_by_id(form.product_id)
        .await
    {
        Ok(Some(product)) => product,
        Ok(None) => {
            Flash::error("This product is no longer available").set(&session).await;
            return Ok(Redirect::to(&redirect_to).into_response());
        }
        Err(e) => {
            tracing::error!("Failed to look up product for cart: {e}");
            Flash::error("Could not add to cart, please try again").set(&session).await;
            return Ok(Redirect::to(&redirect_to).into_response());
        }
    };

    let mut cart = load_cart(&session).await?;
    cart.add_item(product.to_cart_item());
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &product.id.to_string())]),
    );
    Flash::success("Added to cart").set(&session).await;

    Ok(Redirect::to(&redirect_to).into_response())
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(form.product_id, form.quantity);
    save_cart(&session, &cart).await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(form.product_id);
    save_cart(&session, &cart).await?;
    Flash::success("Item removed from cart").set(&session).await;
    Ok(Redirect::to("/cart"))
}

/// Cart count badge fragment.
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.total_items(),
    })
}
