//! Short-lived cache for the storefront's hottest catalog reads.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::error::BackendError;
use crate::rows::{BannerRow, CategoryRow, ProductRow};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    ActiveCategories,
    ActiveBanners,
    Featured { limit: usize },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Arc<Vec<CategoryRow>>),
    Banners(Arc<Vec<BannerRow>>),
    Products(Arc<Vec<ProductRow>>),
}

/// Memoises active categories, active banners, and featured products for
/// 60 seconds.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Cache<CacheKey, CacheValue>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(64).time_to_live(ttl).build(),
        }
    }

    /// Active categories, loading through `load` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; failures are not cached.
    pub async fn categories<F>(&self, load: F) -> Result<Arc<Vec<CategoryRow>>, BackendError>
    where
        F: Future<Output = Result<Vec<CategoryRow>, BackendError>>,
    {
        if let Some(CacheValue::Categories(rows)) = self.inner.get(&CacheKey::ActiveCategories).await {
            return Ok(rows);
        }
        let rows = Arc::new(load.await?);
        self.inner
            .insert(CacheKey::ActiveCategories, CacheValue::Categories(Arc::clone(&rows)))
            .await;
        Ok(rows)
    }

    /// Active banners, loading through `load` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; failures are not cached.
    pub async fn banners<F>(&self, load: F) -> Result<Arc<Vec<BannerRow>>, BackendError>
    where
        F: Future<Output = Result<Vec<BannerRow>, BackendError>>,
    {
        if let Some(CacheValue::Banners(rows)) = self.inner.get(&CacheKey::ActiveBanners).await {
            return Ok(rows);
        }
        let rows = Arc::new(load.await?);
        self.inner
            .insert(CacheKey::ActiveBanners, CacheValue::Banners(Arc::clone(&rows)))
            .await;
        Ok(rows)
    }

    /// Featured products, loading through `load` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; failures are not cached.
    pub async fn featured<F>(
        &self,
        limit: usize,
        load: F,
    ) -> Result<Arc<Vec<ProductRow>>, BackendError>
    where
        F: Future<Output = Result<Vec<ProductRow>, BackendError>>,
    {
        let key = CacheKey::Featured { limit };
        if let Some(CacheValue::Products(rows)) = self.inner.get(&key).await {
            return Ok(rows);
        }
        let rows = Arc::new(load.await?);
        self.inner
            .insert(key, CacheValue::Products(Arc::clone(&rows)))
            .await;
        Ok(rows)
    }

    /// Drop every cached entry after a catalog write.
    pub fn invalidate_all(&self) {
        tracing::debug!("Invalidating catalog cache");
        self.inner.invalidate_all();
    }
}
