//! Fixed-rate tax provider - one rate per tax category

use super::provider::{TaxProvider, TaxRateResult, TaxRequest};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::Customer;
use std::collections::HashMap;

pub const FIXED_RATE_SYSTEM_NAME: &str = "tax.fixedrate";

#[derive(Debug, Clone, Default)]
pub struct FixedRateTaxProvider {
    rates: HashMap<i64, Decimal>,
    /// Rate for requests without a (known) tax category
    default_rate: Decimal,
    priority: i32,
    /// Limited to these stores; empty means all
    stores: Vec<i64>,
    /// Limited to these customer groups; empty means all
    customer_group_ids: Vec<i64>,
}

impl FixedRateTaxProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, tax_category_id: i64, rate: Decimal) -> Self {
        self.rates.insert(tax_category_id, rate);
        self
    }

    pub fn with_default_rate(mut self, rate: Decimal) -> Self {
        self.default_rate = rate;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn limited_to_stores(mut self, stores: Vec<i64>) -> Self {
        self.stores = stores;
        self
    }

    pub fn limited_to_groups(mut self, customer_group_ids: Vec<i64>) -> Self {
        self.customer_group_ids = customer_group_ids;
        self
    }

    pub fn rate_for(&self, tax_category_id: Option<i64>) -> Decimal {
        tax_category_id
            .and_then(|id| self.rates.get(&id).copied())
            .unwrap_or(self.default_rate)
    }
}

#[async_trait]
impl TaxProvider for FixedRateTaxProvider {
    fn system_name(&self) -> &str {
        FIXED_RATE_SYSTEM_NAME
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_authorized_for_store(&self, store_id: i64) -> bool {
        self.stores.is_empty() || self.stores.contains(&store_id)
    }

    fn is_authorized_for_customer(&self, customer: &Customer) -> bool {
        self.customer_group_ids.is_empty()
            || customer
                .group_ids()
                .any(|id| self.customer_group_ids.contains(&id))
    }

    async fn get_tax_rate(&self, request: &TaxRequest) -> TaxRateResult {
        TaxRateResult::rate(self.rate_for(request.tax_category_id))
    }
}
