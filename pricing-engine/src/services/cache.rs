//! 缓存服务 - key/value get-or-compute with prefix invalidation
//!
//! Values are stored type-erased; a lookup with the wrong type is treated
//! as a miss and recomputed.

use dashmap::DashMap;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// Cache key prefix for discounts
pub const DISCOUNTS_PREFIX: &str = "discount.";
/// Cache key prefix for discount coupons
pub const COUPONS_PREFIX: &str = "discount_coupon.";
/// Cache key prefix for tax categories
pub const TAX_CATEGORIES_PREFIX: &str = "tax_category.";

type CachedValue = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Default)]
pub struct CacheService {
    entries: Arc<DashMap<String, CachedValue>>,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl CacheService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, if present and of type `T`
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entries
            .get(key)
            .and_then(|entry| entry.value().downcast_ref::<T>().cloned())
    }

    pub fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entries.insert(key.into(), Arc::new(value));
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// Errors from `factory` are returned as-is and nothing is stored.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: &str, factory: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            return Ok(hit);
        }
        let value = factory().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Drop every entry whose key starts with `prefix`
    pub fn remove_by_prefix(&self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        tracing::debug!(prefix, "Cache invalidated by prefix");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
