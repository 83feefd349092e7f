//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use luxe_backend::tables::{DashboardStats, OrderRepository};
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::AdminPage;
use crate::state::AppState;

/// Orders listed under "Recent Orders".
pub const RECENT_ORDERS: usize = 5;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: AdminPage,
    pub stats: DashboardStats,
}

/// Dashboard page handler.
///
/// A failed lookup is logged and the page renders with zeroed figures.
#[instrument(skip_all, fields(admin = %admin.user_id()))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
) -> DashboardTemplate {
    let stats = OrderRepository::new(state.backend(), Some(admin.token()))
        .dashboard(RECENT_ORDERS)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to load dashboard stats: {e}");
            DashboardStats::default()
        });

    DashboardTemplate { page, stats }
}
