//! Discount Coupon Repository

use super::{Entity, MemoryTable, RepoError, RepoResult, Repository};
use shared::models::DiscountCoupon;
use std::sync::Arc;

impl Entity for DiscountCoupon {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone)]
pub struct DiscountCouponRepository {
    base: Arc<dyn Repository<DiscountCoupon>>,
}

impl Default for DiscountCouponRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountCouponRepository {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryTable::new()))
    }

    pub fn with_backend(base: Arc<dyn Repository<DiscountCoupon>>) -> Self {
        Self { base }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<DiscountCoupon>> {
        self.base.find_by_id(id).await
    }

    /// Find coupon by code (trimmed, case-insensitive)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<DiscountCoupon>> {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Ok(None);
        }
        let rows = self
            .base
            .find_by(&move |c: &DiscountCoupon| c.coupon_code.eq_ignore_ascii_case(&code))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// All coupons generated for a discount
    pub async fn find_by_discount(&self, discount_id: i64) -> RepoResult<Vec<DiscountCoupon>> {
        self.base
            .find_by(&move |c: &DiscountCoupon| c.discount_id == discount_id)
            .await
    }

    /// Insert a coupon; codes are unique across discounts
    pub async fn insert(&self, coupon: DiscountCoupon) -> RepoResult<DiscountCoupon> {
        if coupon.coupon_code.trim().is_empty() {
            return Err(RepoError::Validation("coupon code is empty".into()));
        }
        if self.find_by_code(&coupon.coupon_code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Coupon '{}' already exists",
                coupon.coupon_code
            )));
        }
        self.base.insert(coupon).await
    }

    pub async fn update(&self, coupon: DiscountCoupon) -> RepoResult<DiscountCoupon> {
        self.base.update(coupon).await
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        self.base.delete(id).await
    }
}
