//! Discount Repository

use super::{Entity, MemoryTable, RepoResult, Repository};
use shared::models::{Discount, DiscountType};
use std::sync::Arc;

impl Entity for Discount {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone)]
pub struct DiscountRepository {
    base: Arc<dyn Repository<Discount>>,
}

impl Default for DiscountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountRepository {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryTable::new()))
    }

    pub fn with_backend(base: Arc<dyn Repository<Discount>>) -> Self {
        Self { base }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Discount>> {
        self.base.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Discount>> {
        self.base.find_by_id(id).await
    }

    /// Find discounts of one assignment type
    pub async fn find_by_type(&self, discount_type: DiscountType) -> RepoResult<Vec<Discount>> {
        self.base
            .find_by(&move |d: &Discount| d.discount_type == discount_type)
            .await
    }

    /// Find discounts of one type bound to any of the given entity ids
    /// (categories, brands, collections or vendors)
    pub async fn find_assigned_to(
        &self,
        discount_type: DiscountType,
        entity_ids: &[i64],
    ) -> RepoResult<Vec<Discount>> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = entity_ids.to_vec();
        self.base
            .find_by(&move |d: &Discount| {
                d.discount_type == discount_type
                    && d.assigned_entity_ids.iter().any(|id| ids.contains(id))
            })
            .await
    }

    pub async fn insert(&self, discount: Discount) -> RepoResult<Discount> {
        self.base.insert(discount).await
    }

    pub async fn update(&self, discount: Discount) -> RepoResult<Discount> {
        self.base.update(discount).await
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.base.delete(id).await
    }
}
