//! Tax provider contract
//!
//! A provider turns a [`TaxRequest`] into a rate. Providers are registered
//! by a stable system name (see [`super::TaxProviderRegistry`]).

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{Address, Customer, Product};

/// Per-call tax calculation input (never persisted)
#[derive(Debug, Clone)]
pub struct TaxRequest {
    pub customer: Customer,
    pub product: Option<Product>,
    pub price: Decimal,
    pub tax_category_id: Option<i64>,
    /// Taxable address; `None` when neither the customer nor the settings
    /// provide one
    pub address: Option<Address>,
    pub store_id: i64,
}

/// Provider answer: a rate, or the reasons it could not produce one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateResult {
    pub tax_rate: Decimal,
    pub errors: Vec<String>,
}

impl TaxRateResult {
    pub fn rate(tax_rate: Decimal) -> Self {
        Self {
            tax_rate,
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            errors: vec![message.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pluggable tax-rate provider
#[async_trait]
pub trait TaxProvider: Send + Sync {
    /// Stable key, matched case-insensitively
    fn system_name(&self) -> &str;

    /// Lower value sorts first
    fn priority(&self) -> i32 {
        0
    }

    fn is_authorized_for_store(&self, _store_id: i64) -> bool {
        true
    }

    fn is_authorized_for_customer(&self, _customer: &Customer) -> bool {
        true
    }

    async fn get_tax_rate(&self, request: &TaxRequest) -> TaxRateResult;
}
