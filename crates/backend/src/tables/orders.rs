//! Order repository.

use luxe_core::{Cart, OrderId, OrderStatus, Price, UserId};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use super::{CategoryRepository, ORDER_ITEMS, ORDERS, ProductRepository};
use crate::client::BackendClient;
use crate::error::BackendError;
use crate::rows::{NewOrder, NewOrderItem, OrderRow, StatusPatch};

const ORDER_WITH_ITEMS: &str = "*, order_items(*)";

/// Figures shown on the admin dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_categories: u64,
    pub total_orders: u64,
    pub total_revenue: Price,
    pub pending_orders: u64,
    pub recent_orders: Vec<OrderRow>,
}

/// Repository for `orders` and `order_items`.
pub struct OrderRepository<'a> {
    client: &'a BackendClient,
    token: Option<&'a SecretString>,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient, token: Option<&'a SecretString>) -> Self {
        Self { client, token }
    }

    /// Place an order for the cart's contents.
    ///
    /// The order row is written first so its id can be stamped on every
    /// item. Items are priced at their effective unit price. If the items
    /// are rejected the order row is deleted again before the error is
    /// returned, so a failed checkout leaves no empty order behind.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert is rejected.
    #[instrument(skip(self, order, cart), fields(items = cart.items().len()))]
    pub async fn place(&self, order: &NewOrder, cart: &Cart) -> Result<OrderRow, BackendError> {
        let stored: Vec<OrderRow> = self
            .client
            .from(ORDERS)
            .with_token(self.token)
            .insert_returning(std::slice::from_ref(order))
            .await?;
        let order = stored
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound("inserted order".to_string()))?;

        let items: Vec<NewOrderItem> = cart
            .items()
            .iter()
            .map(|item| NewOrderItem::from_cart(order.id, item))
            .collect();
        if !items.is_empty() {
            let inserted = self
                .client
                .from(ORDER_ITEMS)
                .with_token(self.token)
                .insert(&items)
                .await;
            if let Err(e) = inserted {
                self.discard(order.id).await;
                return Err(e);
            }
        }

        tracing::info!(order_id = %order.id, total = %order.total_amount, "Order placed");
        Ok(order)
    }

    /// Delete an order whose items could not be stored.
    async fn discard(&self, id: OrderId) {
        let deleted = self
            .client
            .from(ORDERS)
            .eq("id", id)
            .with_token(self.token)
            .delete()
            .await;
        match deleted {
            Ok(0) => tracing::error!(order_id = %id, "Order without items was not deleted"),
            Ok(_) => tracing::warn!(order_id = %id, "Deleted order after its items were rejected"),
            Err(e) => {
                tracing::error!(order_id = %id, error = %e, "Failed to delete order without items");
            }
        }
    }

    /// One of the user's own orders, with items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderRow>, BackendError> {
        self.client
            .from(ORDERS)
            .select(ORDER_WITH_ITEMS)
            .eq("id", id)
            .eq("user_id", user_id)
            .with_token(self.token)
            .fetch_optional()
            .await
    }

    /// Every order, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_all(&self) -> Result<Vec<OrderRow>, BackendError> {
        self.client
            .from(ORDERS)
            .select(ORDER_WITH_ITEMS)
            .order("created_at", false)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// The most recent orders, with items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn recent(&self, limit: usize) -> Result<Vec<OrderRow>, BackendError> {
        self.client
            .from(ORDERS)
            .select(ORDER_WITH_ITEMS)
            .order("created_at", false)
            .limit(limit)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no order has this id.
    pub async fn get(&self, id: OrderId) -> Result<OrderRow, BackendError> {
        self.client
            .from(ORDERS)
            .select(ORDER_WITH_ITEMS)
            .eq("id", id)
            .with_token(self.token)
            .fetch_one()
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no order has this id.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(ORDERS)
            .eq("id", id)
            .with_token(self.token)
            .update(&StatusPatch { status })
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("order {id}")));
        }
        Ok(())
    }

    /// Sum of `total_amount` over all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn revenue(&self) -> Result<Price, BackendError> {
        #[derive(Deserialize)]
        struct Amount {
            total_amount: Price,
        }

        let rows: Vec<Amount> = self
            .client
            .from(ORDERS)
            .select("total_amount")
            .with_token(self.token)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.total_amount).sum())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn count(&self, status: Option<OrderStatus>) -> Result<u64, BackendError> {
        let mut query = self.client.from(ORDERS);
        if let Some(status) = status {
            query = query.eq("status", status);
        }
        query.with_token(self.token).count().await
    }

    /// Everything the admin dashboard shows.
    ///
    /// # Errors
    ///
    /// Returns the first failing lookup's error.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, recent: usize) -> Result<DashboardStats, BackendError> {
        Ok(DashboardStats {
            total_products: ProductRepository::new(self.client, self.token).count().await?,
            total_categories: CategoryRepository::new(self.client, self.token).count().await?,
            total_orders: self.count(None).await?,
            total_revenue: self.revenue().await?,
            pending_orders: self.count(Some(OrderStatus::Pending)).await?,
            recent_orders: self.recent(recent).await?,
        })
    }
}
