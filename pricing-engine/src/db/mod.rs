//! Database Module
//!
//! Entity repositories used by the discount, tax category and EU-VAT code

pub mod repository;

use repository::{
    CountryRepository, DiscountCouponRepository, DiscountRepository, DiscountUsageRepository,
    TaxCategoryRepository,
};

/// Database service: one repository per persisted entity
#[derive(Clone, Default)]
pub struct DbService {
    pub countries: CountryRepository,
    pub discounts: DiscountRepository,
    pub coupons: DiscountCouponRepository,
    pub usage_history: DiscountUsageRepository,
    pub tax_categories: TaxCategoryRepository,
}

impl DbService {
    /// In-memory storage for every entity
    pub fn in_memory() -> Self {
        tracing::debug!("Using in-memory repositories");
        Self::default()
    }
}
