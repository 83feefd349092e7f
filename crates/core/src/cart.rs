//! Shopping cart store.
//!
//! The cart is a small ordered map from product id to quantity, plus the
//! display data captured when the item was added. It has no knowledge of
//! where it is persisted; the storefront keeps it in the visitor's session.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub discount_price: Option<Price>,
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    /// Price charged per unit: the discount price when set and non-zero.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.price.with_discount(self.discount_price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// The visitor's cart.
///
/// Invariants: ids are unique and every quantity is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// An existing line for the same product has its quantity bumped by one;
    /// the incoming quantity is ignored in that case.
    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem { quantity: 1, ..item });
        }
    }

    /// Set the quantity of a line. Zero or less removes it.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn remove_item(&mut self, id: ProductId) {
        self.items.retain(|i| i.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all quantities, shown on the cart badge.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of all line totals at their effective unit price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn item(n: u128, cents: i64, discount: Option<i64>) -> CartItem {
        CartItem {
            id: ProductId::new(Uuid::from_u128(n)),
            name: format!("Item {n}"),
            price: Price::from_cents(cents),
            discount_price: discount.map(Price::from_cents),
            image: "/static/placeholder.svg".to_string(),
            quantity: 7,
        }
    }

    #[test]
    fn test_add_new_item_starts_at_one() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1000, None));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_add_existing_item_increments() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1000, None));
        cart.add_item(item(1, 1000, None));
        cart.add_item(item(2, 500, None));
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1000, None));
        cart.update_quantity(ProductId::new(Uuid::from_u128(1)), 4);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1000, None));
        cart.add_item(item(2, 1000, None));
        cart.update_quantity(ProductId::new(Uuid::from_u128(1)), 0);
        cart.update_quantity(ProductId::new(Uuid::from_u128(2)), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_id_is_ignored() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 1000, None));
        cart.update_quantity(ProductId::new(Uuid::from_u128(9)), 5);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_total_price_prefers_discount() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 2000, Some(1500)));
        cart.add_item(item(1, 2000, Some(1500)));
        cart.add_item(item(2, 999, None));
        assert_eq!(cart.total_price(), Price::from_cents(3999));
    }

    #[test]
    fn test_zero_discount_charges_list_price() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 4500, Some(0)));
        assert_eq!(cart.items()[0].unit_price(), Price::from_cents(4500));
        assert_eq!(cart.total_price(), Price::from_cents(4500));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 100, None));
        cart.add_item(item(2, 100, None));
        cart.remove_item(ProductId::new(Uuid::from_u128(1)));
        assert_eq!(cart.items().len(), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::zero());
    }

    #[test]
    fn test_serde_round_trip_preserves_order() {
        let mut cart = Cart::new();
        cart.add_item(item(2, 100, None));
        cart.add_item(item(1, 100, None));
        let json = serde_json::to_string(&cart).unwrap_or_default();
        let restored: Cart = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(restored, cart);
    }
}
