//! Layout data for console pages.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::flash::Flash;
use super::session::{CurrentAdmin, keys};
use crate::error::AppError;
use crate::state::AppState;

/// Sidebar entries as `(label, path)`.
pub const SIDEBAR: &[(&str, &str)] = &[
    ("Dashboard", "/"),
    ("Products", "/products"),
    ("Categories", "/categories"),
    ("Orders", "/orders"),
    ("Banners", "/banners"),
];

/// One sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// What the sidebar layout needs.
///
/// Extracting this consumes the pending flash. It does not check
/// authentication; handlers pair it with `RequireAdminAuth`.
#[derive(Debug, Clone, Default)]
pub struct AdminPage {
    pub admin_name: String,
    pub current_path: String,
    pub flash: Option<Flash>,
    pub nav: Vec<NavLink>,
    /// Target of the "Back to Store" link.
    pub storefront_url: String,
}

impl AdminPage {
    /// Build the layout data for `path`.
    #[must_use]
    pub fn new(admin_name: impl Into<String>, path: &str, flash: Option<Flash>) -> Self {
        Self {
            admin_name: admin_name.into(),
            current_path: path.to_string(),
            flash,
            nav: SIDEBAR
                .iter()
                .map(|&(label, href)| NavLink {
                    label,
                    href,
                    active: is_section(path, href),
                })
                .collect(),
            storefront_url: String::new(),
        }
    }
}

/// The dashboard link matches only `/`; the others match their subtree.
fn is_section(path: &str, href: &str) -> bool {
    if href == "/" {
        return path == "/";
    }
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl FromRequestParts<AppState> for AdminPage {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(AppError::Internal("session layer not installed".to_string()));
        };

        let admin = session.get::<CurrentAdmin>(keys::CURRENT_ADMIN).await?;
        let name = admin.as_ref().map_or("", CurrentAdmin::name).to_string();

        Ok(Self {
            storefront_url: state.config().storefront_url.clone(),
            ..Self::new(name, parts.uri.path(), Flash::take(session).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(path: &str) -> Vec<&'static str> {
        AdminPage::new("Ada", path, None)
            .nav
            .into_iter()
            .filter(|link| link.active)
            .map(|link| link.label)
            .collect()
    }

    #[test]
    fn test_dashboard_only_matches_root() {
        assert_eq!(active("/"), vec!["Dashboard"]);
    }

    #[test]
    fn test_subpages_highlight_their_section() {
        assert_eq!(active("/products"), vec!["Products"]);
        assert_eq!(active("/products/new"), vec!["Products"]);
        assert_eq!(active("/orders/4b1f/status"), vec!["Orders"]);
    }

    #[test]
    fn test_prefix_without_separator_does_not_match() {
        assert!(active("/productsx").is_empty());
    }
}
