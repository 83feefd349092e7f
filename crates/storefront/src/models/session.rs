//! Session-related types.
//!
//! The session store is in memory, so tokens held here never leave the
//! process; the cookie only carries the signed session id.

use luxe_backend::AuthSession;
use luxe_core::Cart;
use tower_sessions::Session;

/// Session-stored identity of the signed-in shopper.
///
/// Holds the backend tokens so requests can run as the user and row-level
/// security sees who they are.
pub type CurrentUser = AuthSession;

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}

/// Load the visitor's cart, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Persist the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use luxe_core::{CartItem, Price, ProductId};
    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_cart_persists_in_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert!(load_cart(&session).await.unwrap().is_empty());

        let mut cart = Cart::new();
        cart.add_item(CartItem {
            id: ProductId::new(uuid::Uuid::from_u128(1)),
            name: "Fountain Pen".to_string(),
            price: Price::from_cents(4500),
            discount_price: None,
            image: "/static/images/placeholder.svg".to_string(),
            quantity: 1,
        });
        save_cart(&session, &cart).await.unwrap();

        let restored = load_cart(&session).await.unwrap();
        assert_eq!(restored.total_items(), 1);
        assert_eq!(restored.total_price(), Price::from_cents(4500));
    }
}
