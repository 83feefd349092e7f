//! Order route handlers.
//!
//! Orders are created by the storefront checkout; the console only reads
//! them and moves them through the fulfillment statuses.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use luxe_backend::rows::OrderRow;
use luxe_backend::tables::OrderRepository;
use luxe_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminPage, Flash};
use crate::state::AppState;

/// Order table.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: AdminPage,
    pub orders: Vec<OrderRow>,
    pub statuses: &'static [OrderStatus],
}

/// Single order with its items.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub page: AdminPage,
    pub order: OrderRow,
    pub statuses: &'static [OrderStatus],
}

/// Status change form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
    /// Where to go afterwards; only `detail` is recognised.
    #[serde(default)]
    pub back: Option<String>,
}

/// GET /orders
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
) -> Result<OrdersIndexTemplate> {
    let orders = OrderRepository::new(state.backend(), Some(admin.token()))
        .list_all()
        .await?;
    Ok(OrdersIndexTemplate {
        page,
        orders,
        statuses: &OrderStatus::ALL,
    })
}

/// GET /orders/{id}
#[instrument(skip(state, admin, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
    Path(id): Path<OrderId>,
) -> Result<OrderShowTemplate> {
    let order = OrderRepository::new(state.backend(), Some(admin.token()))
        .get(id)
        .await?;
    Ok(OrderShowTemplate {
        page,
        order,
        statuses: &OrderStatus::ALL,
    })
}

/// Move an order to another status. Any transition is allowed.
///
/// POST /orders/{id}/status
#[instrument(skip(state, admin, session, form), fields(status = %form.status))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    match OrderRepository::new(state.backend(), Some(admin.token()))
        .set_status(id, form.status)
        .await
    {
        Ok(()) => {
            tracing::info!(order_id = %id, "Order status updated");
            Flash::success("Order status updated").set(&session).await;
        }
        Err(e) => {
            tracing::warn!("Failed to update order status: {e}");
            Flash::error(format!("Failed to update status: {}", e.user_message()))
                .set(&session)
                .await;
        }
    }

    if form.back.as_deref() == Some("detail") {
        Redirect::to(&format!("/orders/{id}"))
    } else {
        Redirect::to("/orders")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::TimeZone;
    use luxe_backend::rows::OrderItemRow;
    use luxe_core::{OrderItemId, Price, ProductId};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::test_support;

    fn order() -> OrderRow {
        let id = OrderId::new(Uuid::from_u128(0xabcd_ef01_0000_0000_0000_0000_0000_0009));
        OrderRow {
            id,
            user_id: None,
            total_amount: Price::from_cents(17_800),
            status: OrderStatus::Processing,
            shipping_address: Some("12 Harbour Road".to_string()),
            shipping_city: Some("Lisbon".to_string()),
            shipping_country: Some("Portugal".to_string()),
            phone: Some("+351 555 0101".to_string()),
            notes: Some("Leave at the door".to_string()),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).unwrap(),
            order_items: vec![OrderItemRow {
                id: OrderItemId::new(Uuid::from_u128(1)),
                order_id: id,
                product_id: Some(ProductId::new(Uuid::from_u128(2))),
                product_name: "Fountain Pen".to_string(),
                quantity: 2,
                price: Price::from_cents(8_900),
            }],
        }
    }

    #[test]
    fn test_order_table_row() {
        let html = OrdersIndexTemplate {
            page: AdminPage::new("Ada", "/orders", None),
            orders: vec![order()],
            statuses: &OrderStatus::ALL,
        }
        .render()
        .unwrap();
        assert!(html.contains("Track and manage customer orders"));
        assert!(html.contains("#abcdef01"));
        assert!(html.contains("May 17, 2024"));
        assert!(html.contains("+351 555 0101"));
        assert!(html.contains("Lisbon"));
        assert!(html.contains("$178.00"));
        assert!(html.contains("value=\"processing\" selected"));
    }

    #[test]
    fn test_order_table_without_contact_details() {
        let mut bare = order();
        bare.phone = None;
        bare.shipping_city = None;
        let html = OrdersIndexTemplate {
            page: AdminPage::new("Ada", "/orders", None),
            orders: vec![bare],
            statuses: &OrderStatus::ALL,
        }
        .render()
        .unwrap();
        assert!(html.contains("N/A"));
    }

    #[test]
    fn test_empty_orders() {
        let html = OrdersIndexTemplate {
            page: AdminPage::new("Ada", "/orders", None),
            orders: Vec::new(),
            statuses: &OrderStatus::ALL,
        }
        .render()
        .unwrap();
        assert!(html.contains("No orders yet."));
    }

    #[test]
    fn test_order_detail_lists_items_and_shipping() {
        let html = OrderShowTemplate {
            page: AdminPage::new("Ada", "/orders/abcdef01", None),
            order: order(),
            statuses: &OrderStatus::ALL,
        }
        .render()
        .unwrap();
        assert!(html.contains("Order #abcdef01"));
        assert!(html.contains("May 17, 2024 10:30"));
        assert!(html.contains("Shipping Details"));
        assert!(html.contains("12 Harbour Road"));
        assert!(html.contains("Lisbon, Portugal"));
        assert!(html.contains("Leave at the door"));
        assert!(html.contains("Fountain Pen"));
        assert!(html.contains("$89.00"));
        assert!(html.contains("Total: $178.00"));
        assert!(html.contains("badge-shipped"));
    }

    #[test]
    fn test_status_form_parses_wire_value() {
        let form: StatusForm =
            serde_json::from_value(serde_json::json!({ "status": "delivered", "back": "detail" }))
                .unwrap();
        assert_eq!(form.status, OrderStatus::Delivered);
        assert_eq!(form.back.as_deref(), Some("detail"));
        assert!(serde_json::from_value::<StatusForm>(serde_json::json!({ "status": "lost" })).is_err());
    }

    #[tokio::test]
    async fn test_status_change_requires_admin() {
        let app = crate::app(test_support::state()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/orders/{}/status", Uuid::from_u128(9)))
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("status=shipped"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }
}
