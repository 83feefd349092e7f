//! Product repository.

use luxe_core::{ProductId, ProductStatus, UserId};
use secrecy::SecretString;

use super::{PRODUCT_WITH_CATEGORY, PRODUCTS};
use crate::client::BackendClient;
use crate::error::BackendError;
use crate::rows::{
    ActivePatch, NewProduct, NewSellerProduct, ProductPatch, ProductRow, ReviewPatch,
    SellerProductPatch,
};

/// Repository for `products`.
pub struct ProductRepository<'a> {
    client: &'a BackendClient,
    token: Option<&'a SecretString>,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(client: &'a BackendClient, token: Option<&'a SecretString>) -> Self {
        Self { client, token }
    }

    // =========================================================================
    // Storefront reads
    // =========================================================================

    /// Active, featured products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn featured(&self, limit: usize) -> Result<Vec<ProductRow>, BackendError> {
        self.client
            .from(PRODUCTS)
            .select(PRODUCT_WITH_CATEGORY)
            .eq("is_active", true)
            .eq("is_featured", true)
            .order("created_at", false)
            .limit(limit)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// Active products for the catalog listing, newest first.
    ///
    /// The category filter compares the embedded category's slug, so it is
    /// applied after the fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_active(
        &self,
        category_slug: Option<&str>,
        featured_only: bool,
    ) -> Result<Vec<ProductRow>, BackendError> {
        let mut query = self
            .client
            .from(PRODUCTS)
            .select(PRODUCT_WITH_CATEGORY)
            .eq("is_active", true);
        if featured_only {
            query = query.eq("is_featured", true);
        }
        let rows: Vec<ProductRow> = query
            .order("created_at", false)
            .with_token(self.token)
            .fetch()
            .await?;

        Ok(match category_slug {
            Some(slug) => rows.into_iter().filter(|p| p.in_category(slug)).collect(),
            None => rows,
        })
    }

    /// An active product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn active_by_slug(&self, slug: &str) -> Result<Option<ProductRow>, BackendError> {
        self.client
            .from(PRODUCTS)
            .select(PRODUCT_WITH_CATEGORY)
            .eq("slug", slug)
            .eq("is_active", true)
            .with_token(self.token)
            .fetch_optional()
            .await
    }

    /// An active product by id (used when adding to the cart).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn active_by_id(&self, id: ProductId) -> Result<Option<ProductRow>, BackendError> {
        self.client
            .from(PRODUCTS)
            .select("*")
            .eq("id", id)
            .eq("is_active", true)
            .with_token(self.token)
            .fetch_optional()
            .await
    }

    // =========================================================================
    // Seller operations (scoped to the owner)
    // =========================================================================

    /// Products submitted by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn by_seller(&self, user_id: UserId) -> Result<Vec<ProductRow>, BackendError> {
        self.client
            .from(PRODUCTS)
            .select(PRODUCT_WITH_CATEGORY)
            .eq("user_id", user_id)
            .order("created_at", false)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// A product owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn owned(
        &self,
        id: ProductId,
        user_id: UserId,
    ) -> Result<Option<ProductRow>, BackendError> {
        self.client
            .from(PRODUCTS)
            .select("*")
            .eq("id", id)
            .eq("user_id", user_id)
            .with_token(self.token)
            .fetch_optional()
            .await
    }

    /// Submit a product for review.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    pub async fn submit(&self, product: &NewSellerProduct) -> Result<(), BackendError> {
        self.client
            .from(PRODUCTS)
            .with_token(self.token)
            .insert(product)
            .await
    }

    /// Update the seller's own product, sending it back to review.
    ///
    /// Returns `false` if no row matched both the id and the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_owned(
        &self,
        id: ProductId,
        user_id: UserId,
        patch: &SellerProductPatch,
    ) -> Result<bool, BackendError> {
        let affected = self
            .client
            .from(PRODUCTS)
            .eq("id", id)
            .eq("user_id", user_id)
            .with_token(self.token)
            .update(patch)
            .await?;
        Ok(affected > 0)
    }

    /// Delete the seller's own product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_owned(&self, id: ProductId, user_id: UserId) -> Result<bool, BackendError> {
        let affected = self
            .client
            .from(PRODUCTS)
            .eq("id", id)
            .eq("user_id", user_id)
            .with_token(self.token)
            .delete()
            .await?;
        Ok(affected > 0)
    }

    // =========================================================================
    // Admin operations
    // =========================================================================

    /// Every product, newest first, with its category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_all(&self) -> Result<Vec<ProductRow>, BackendError> {
        self.client
            .from(PRODUCTS)
            .select(PRODUCT_WITH_CATEGORY)
            .order("created_at", false)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// A product by id regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no product has this id.
    pub async fn get(&self, id: ProductId) -> Result<ProductRow, BackendError> {
        self.client
            .from(PRODUCTS)
            .select(PRODUCT_WITH_CATEGORY)
            .eq("id", id)
            .with_token(self.token)
            .fetch_one()
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    pub async fn create(&self, product: &NewProduct) -> Result<(), BackendError> {
        self.client
            .from(PRODUCTS)
            .with_token(self.token)
            .insert(product)
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no product has this id.
    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<(), BackendError> {
        self.scoped_update(id, patch).await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(PRODUCTS)
            .eq("id", id)
            .with_token(self.token)
            .delete()
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    /// Show or hide a product on the storefront.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no product has this id.
    pub async fn set_active(&self, id: ProductId, is_active: bool) -> Result<(), BackendError> {
        self.scoped_update(id, &ActivePatch { is_active }).await
    }

    /// Record the review decision.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no product has this id.
    pub async fn set_review_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<(), BackendError> {
        self.scoped_update(id, &ReviewPatch { status }).await
    }

    /// Total number of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn count(&self) -> Result<u64, BackendError> {
        self.client
            .from(PRODUCTS)
            .with_token(self.token)
            .count()
            .await
    }

    async fn scoped_update<B: serde::Serialize + Sync>(
        &self,
        id: ProductId,
        patch: &B,
    ) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(PRODUCTS)
            .eq("id", id)
            .with_token(self.token)
            .update(patch)
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}
