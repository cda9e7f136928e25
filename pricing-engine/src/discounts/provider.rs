//! Discount amount plugins
//!
//! A discount with `calculate_by_plugin` set delegates its amount to the
//! provider named by `discount_plugin_name`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{Customer, Discount, Product};

#[async_trait]
pub trait DiscountAmountProvider: Send + Sync {
    /// Stable key, matched case-insensitively
    fn system_name(&self) -> &str;

    async fn discount_amount(
        &self,
        discount: &Discount,
        customer: &Customer,
        product: Option<&Product>,
        amount: Decimal,
    ) -> Decimal;
}
