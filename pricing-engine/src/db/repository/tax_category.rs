//! Tax Category Repository

use super::{Entity, MemoryTable, RepoError, RepoResult, Repository};
use shared::models::TaxCategory;
use std::sync::Arc;

impl Entity for TaxCategory {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone)]
pub struct TaxCategoryRepository {
    base: Arc<dyn Repository<TaxCategory>>,
}

impl Default for TaxCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxCategoryRepository {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryTable::new()))
    }

    pub fn with_backend(base: Arc<dyn Repository<TaxCategory>>) -> Self {
        Self { base }
    }

    /// All categories ordered by display order, then id
    pub async fn find_all(&self) -> RepoResult<Vec<TaxCategory>> {
        let mut categories = self.base.find_all().await?;
        categories.sort_by_key(|c| (c.display_order, c.id));
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<TaxCategory>> {
        self.base.find_by_id(id).await
    }

    pub async fn insert(&self, category: TaxCategory) -> RepoResult<TaxCategory> {
        if category.name.trim().is_empty() {
            return Err(RepoError::Validation("tax category name is empty".into()));
        }
        self.base.insert(category).await
    }

    pub async fn update(&self, category: TaxCategory) -> RepoResult<TaxCategory> {
        if category.name.trim().is_empty() {
            return Err(RepoError::Validation("tax category name is empty".into()));
        }
        self.base.update(category).await
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.base.delete(id).await
    }
}
