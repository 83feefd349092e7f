//! One-shot notifications.
//!
//! Console handlers that redirect after a write leave a [`Flash`] in the
//! session; the next full page render takes it out and shows it once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// A notification waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// CSS class for the alert bar.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "alert alert-success",
            FlashKind::Error => "alert alert-error",
        }
    }

    /// Store this flash, replacing any pending one.
    ///
    /// A failed write only loses the notification, so it is logged and
    /// otherwise ignored.
    pub async fn set(self, session: &Session) {
        if let Err(e) = session.insert(keys::FLASH, &self).await {
            tracing::warn!(error = %e, "Failed to store flash message");
        }
    }

    /// Remove and return the pending flash, if any.
    pub async fn take(session: &Session) -> Option<Self> {
        session.remove::<Self>(keys::FLASH).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        Flash::success("Category deleted").set(&session).await;

        assert_eq!(
            Flash::take(&session).await,
            Some(Flash::success("Category deleted"))
        );
        assert_eq!(Flash::take(&session).await, None);
    }

    #[tokio::test]
    async fn test_latest_flash_wins() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        Flash::success("Banner created successfully").set(&session).await;
        Flash::error("Failed to delete banner: not found").set(&session).await;

        let flash = Flash::take(&session).await;
        assert_eq!(flash.as_ref().map(Flash::css_class), Some("alert alert-error"));
    }
}
