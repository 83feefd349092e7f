//! Category repository.

use luxe_core::CategoryId;
use secrecy::SecretString;

use super::CATEGORIES;
use crate::client::BackendClient;
use crate::error::BackendError;
use crate::rows::{CategoryPayload, CategoryRow};

/// Repository for `categories`.
pub struct CategoryRepository<'a> {
    client: &'a BackendClient,
    token: Option<&'a SecretString>,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient, token: Option<&'a SecretString>) -> Self {
        Self { client, token }
    }

    /// Active categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn active(&self) -> Result<Vec<CategoryRow>, BackendError> {
        self.client
            .from(CATEGORIES)
            .select("*")
            .eq("is_active", true)
            .order("name", true)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// Every category ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_all(&self) -> Result<Vec<CategoryRow>, BackendError> {
        self.client
            .from(CATEGORIES)
            .select("*")
            .order("name", true)
            .with_token(self.token)
            .fetch()
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no category has this id.
    pub async fn get(&self, id: CategoryId) -> Result<CategoryRow, BackendError> {
        self.client
            .from(CATEGORIES)
            .select("*")
            .eq("id", id)
            .with_token(self.token)
            .fetch_one()
            .await
    }

    /// Which of `candidates` are already taken, for idempotent seeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn existing_slugs<I, S>(&self, candidates: I) -> Result<Vec<String>, BackendError>
    where
        I: IntoIterator<Item = S>,
        S: std::fmt::Display,
    {
        #[derive(serde::Deserialize)]
        struct SlugOnly {
            slug: String,
        }

        let rows: Vec<SlugOnly> = self
            .client
            .from(CATEGORIES)
            .select("slug")
            .in_list("slug", candidates)
            .with_token(self.token)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.slug).collect())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the row (e.g. duplicate slug).
    pub async fn create(&self, category: &CategoryPayload) -> Result<(), BackendError> {
        self.client
            .from(CATEGORIES)
            .with_token(self.token)
            .insert(category)
            .await
    }

    /// Insert several categories and return the stored rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects any row.
    pub async fn create_many(
        &self,
        categories: &[CategoryPayload],
    ) -> Result<Vec<CategoryRow>, BackendError> {
        self.client
            .from(CATEGORIES)
            .with_token(self.token)
            .insert_returning(categories)
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no category has this id.
    pub async fn update(&self, id: CategoryId, patch: &CategoryPayload) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(CATEGORIES)
            .eq("id", id)
            .with_token(self.token)
            .update(patch)
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("category {id}")));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no category has this id.
    pub async fn delete(&self, id: CategoryId) -> Result<(), BackendError> {
        let affected = self
            .client
            .from(CATEGORIES)
            .eq("id", id)
            .with_token(self.token)
            .delete()
            .await?;
        if affected == 0 {
            return Err(BackendError::NotFound(format!("category {id}")));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn count(&self) -> Result<u64, BackendError> {
        self.client
            .from(CATEGORIES)
            .with_token(self.token)
            .count()
            .await
    }
}
