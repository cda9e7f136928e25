//! Repository Module
//!
//! Entity storage behind a small async CRUD contract. The default backend
//! is an in-process table ([`MemoryTable`]); anything implementing
//! [`Repository`] can replace it.

pub mod country;
pub mod discount;
pub mod discount_coupon;
pub mod discount_usage;
pub mod tax_category;

// Re-exports
pub use country::CountryRepository;
pub use discount::DiscountRepository;
pub use discount_coupon::DiscountCouponRepository;
pub use discount_usage::DiscountUsageRepository;
pub use tax_category::TaxCategoryRepository;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Entities stored in a repository expose their key
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
}

/// Common repository trait for basic CRUD
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>>;
    /// Table query: all rows matching the predicate
    async fn find_by(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> RepoResult<Vec<T>>;
    async fn insert(&self, entity: T) -> RepoResult<T>;
    async fn update(&self, entity: T) -> RepoResult<T>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

/// In-memory table keyed by entity id (ordered, so `find_all` is stable)
#[derive(Clone)]
pub struct MemoryTable<T: Entity> {
    rows: Arc<RwLock<BTreeMap<i64, T>>>,
}

impl<T: Entity> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<T: Entity> std::fmt::Debug for MemoryTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTable")
            .field("rows", &self.rows.read().len())
            .finish()
    }
}

impl<T: Entity> MemoryTable<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryTable<T> {
    async fn find_all(&self) -> RepoResult<Vec<T>> {
        Ok(self.rows.read().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn find_by(
        &self,
        predicate: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> RepoResult<Vec<T>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    async fn insert(&self, entity: T) -> RepoResult<T> {
        let mut rows = self.rows.write();
        if rows.contains_key(&entity.id()) {
            return Err(RepoError::Duplicate(format!("id {}", entity.id())));
        }
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> RepoResult<T> {
        let mut rows = self.rows.write();
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(RepoError::NotFound(format!("id {}", entity.id()))),
        }
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.rows.write().remove(&id).is_some())
    }
}
