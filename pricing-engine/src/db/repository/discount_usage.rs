//! Discount Usage History Repository

use super::{Entity, MemoryTable, RepoResult, Repository};
use shared::models::DiscountUsageHistory;
use std::sync::Arc;

impl Entity for DiscountUsageHistory {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone)]
pub struct DiscountUsageRepository {
    base: Arc<dyn Repository<DiscountUsageHistory>>,
}

impl Default for DiscountUsageRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountUsageRepository {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryTable::new()))
    }

    pub fn with_backend(base: Arc<dyn Repository<DiscountUsageHistory>>) -> Self {
        Self { base }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<DiscountUsageHistory>> {
        self.base.find_by_id(id).await
    }

    /// Usage rows for an order, oldest first
    pub async fn find_by_order(&self, order_id: i64) -> RepoResult<Vec<DiscountUsageHistory>> {
        let mut rows = self
            .base
            .find_by(&move |h: &DiscountUsageHistory| h.order_id == order_id)
            .await?;
        rows.sort_by_key(|h| h.created_on_utc);
        Ok(rows)
    }

    /// Usage rows for a discount, optionally narrowed to one customer
    pub async fn find_by_discount(
        &self,
        discount_id: i64,
        customer_id: Option<i64>,
        include_canceled: bool,
    ) -> RepoResult<Vec<DiscountUsageHistory>> {
        let mut rows = self
            .base
            .find_by(&move |h: &DiscountUsageHistory| {
                h.discount_id == discount_id
                    && customer_id.is_none_or(|c| h.customer_id == c)
                    && (include_canceled || !h.canceled)
            })
            .await?;
        rows.sort_by_key(|h| h.created_on_utc);
        Ok(rows)
    }

    pub async fn insert(&self, history: DiscountUsageHistory) -> RepoResult<DiscountUsageHistory> {
        self.base.insert(history).await
    }

    pub async fn update(&self, history: DiscountUsageHistory) -> RepoResult<DiscountUsageHistory> {
        self.base.update(history).await
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.base.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn make_history(id: i64, discount_id: i64, customer_id: i64, order_id: i64) -> DiscountUsageHistory {
        DiscountUsageHistory {
            id,
            discount_id,
            customer_id,
            order_id,
            coupon_code: None,
            created_on_utc: Utc::now() + Duration::seconds(id),
            canceled: false,
        }
    }

    #[tokio::test]
    async fn test_find_by_order() {
        let repo = DiscountUsageRepository::new();
        repo.insert(make_history(2, 1, 100, 500)).await.unwrap();
        repo.insert(make_history(1, 2, 100, 500)).await.unwrap();
        repo.insert(make_history(3, 1, 100, 501)).await.unwrap();

        let rows = repo.find_by_order(500).await.unwrap();
        assert_eq!(rows.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_find_by_discount_skips_canceled() {
        let repo = DiscountUsageRepository::new();
        repo.insert(make_history(1, 1, 100, 500)).await.unwrap();
        let mut canceled = make_history(2, 1, 100, 501);
        canceled.canceled = true;
        repo.insert(canceled).await.unwrap();
        repo.insert(make_history(3, 1, 200, 502)).await.unwrap();

        assert_eq!(repo.find_by_discount(1, None, false).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_discount(1, None, true).await.unwrap().len(), 3);
        assert_eq!(repo.find_by_discount(1, Some(100), false).await.unwrap().len(), 1);
    }
}
