//! Layout data shared by every full page.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::flash::Flash;
use super::session::{CurrentUser, keys, load_cart};
use crate::error::AppError;

/// Categories linked from the header, as `(label, slug)`.
pub const NAV_CATEGORIES: &[(&str, &str)] = &[
    ("Clothing", "clothing"),
    ("Shoes", "shoes"),
    ("Electronics", "electronics"),
    ("Writing Tools", "writing-tools"),
    ("AI Robots", "ai-robots"),
    ("Machines", "machines"),
];

/// What the base layout needs: who is signed in, the cart badge, and the
/// pending flash.
///
/// Extracting this consumes the flash, so only handlers that render a full
/// page should ask for it.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user_name: Option<String>,
    pub cart_count: u32,
    pub flash: Option<Flash>,
}

impl PageContext {
    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user_name.is_some()
    }

    #[must_use]
    pub const fn nav_categories(&self) -> &'static [(&'static str, &'static str)] {
        NAV_CATEGORIES
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(AppError::Internal("session layer not installed".to_string()));
        };

        let user = session.get::<CurrentUser>(keys::CURRENT_USER).await?;
        let cart = load_cart(session).await?;

        Ok(Self {
            user_name: user.map(|u| u.user.display_name().to_string()),
            cart_count: cart.total_items(),
            flash: Flash::take(session).await,
        })
    }
}
