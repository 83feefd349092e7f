//! Banner repository.

use luxe_core::BannerId;
use secrecy::SecretString;

use super::BANNERS;
use crate::client::BackendClient;
use crate::error::BackendError;
use crate::rows::{BannerPayload, BannerRow};

/// Repository for `banners`.
pub struct BannerRepository<'a> {
    client: &'a BackendClient,
    token: Option<&'a SecretString>,
}

impl<'a> BannerRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient, token: Option<&'a SecretString>) -> Self {
        Self { client, token }
    }

    /// Active banners in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn active(&self) -> Result<Vec<BannerRow>, BackendError> {
        self.client
            .from(BANNERS)
            .select("*")
            .eq("is_active", true)
            .order("display_order", true)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// Every banner in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_all(&self) -> Result<Vec<BannerRow>, BackendError> {
        self.client
            .from(BANNERS)
            .select("*")
            .order("display_order", true)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no banner has this id.
    pub async fn get(&self, id: BannerId) -> Result<BannerRow, BackendError> {
        self.client
            .from(BANNERS)
            .select("*")
            .eq("id", id)
            .with_token(self.token)
            .fetch_one()
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    pub async fn create(&self, banner: &BannerPayload) -> Result<(), BackendError> {
        self.client
            .from(BANNERS)
            .with_token(self.token)
            .insert(banner)
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no banner has this id.
    pub async fn update(&self, id: BannerId, patch: &BannerPayload) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(BANNERS)
            .eq("id", id)
            .with_token(self.token)
            .update(patch)
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("banner {id}")));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no banner has this id.
    pub async fn delete(&self, id: BannerId) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(BANNERS)
            .eq("id", id)
            .with_token(self.token)
            .delete()
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("banner {id}")));
        }
        Ok(())
    }
}
