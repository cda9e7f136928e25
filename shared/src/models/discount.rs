//! Discount Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discount type enum - what the discount is assigned to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Global discount, applies to every product
    AssignedToAllProducts,
    /// Assigned to specific products (product.applied_discounts)
    AssignedToSkus,
    AssignedToCategories,
    AssignedToBrands,
    AssignedToCollections,
    AssignedToVendors,
    AssignedToOrderTotal,
    AssignedToOrderSubTotal,
    AssignedToShipping,
}

/// Discount usage limitation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountLimitationType {
    #[default]
    Unlimited,
    /// N times in total, across all customers
    NTimesOnly,
    /// N times per customer
    NTimesPerCustomer,
}

/// Discount entity (折扣)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub id: i64,
    pub name: String,
    pub discount_type: DiscountType,
    /// Category / brand / collection / vendor IDs the discount is bound to
    #[serde(default)]
    pub assigned_entity_ids: Vec<i64>,
    #[serde(default)]
    pub use_percentage: bool,
    /// Percentage (10 = 10%), only when `use_percentage`
    #[serde(default)]
    pub discount_percentage: Decimal,
    /// Flat amount in the discount currency
    pub discount_amount: Decimal,
    /// Cap for percentage discounts
    pub maximum_discount_amount: Option<Decimal>,
    /// ISO currency code the amount is expressed in (None = any currency)
    pub currency_code: Option<String>,
    pub is_cumulative: bool,
    pub is_enabled: bool,
    pub requires_coupon_code: bool,
    /// Coupons stay usable after an order consumed them
    #[serde(default)]
    pub reused: bool,
    pub start_date_utc: Option<DateTime<Utc>>,
    pub end_date_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_limitation: DiscountLimitationType,
    #[serde(default)]
    pub limitation_times: u32,
    /// Maximum quantity per line the discount applies to (None = unlimited)
    pub maximum_discounted_quantity: Option<u32>,
    #[serde(default)]
    pub calculate_by_plugin: bool,
    pub discount_plugin_name: Option<String>,
    #[serde(default)]
    pub limited_to_stores: bool,
    #[serde(default)]
    pub stores: Vec<i64>,
    pub created_at: i64,
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscountCreate {
    pub name: String,
    pub discount_type: Option<DiscountType>,
    pub assigned_entity_ids: Option<Vec<i64>>,
    pub use_percentage: Option<bool>,
    pub discount_percentage: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub maximum_discount_amount: Option<Decimal>,
    pub currency_code: Option<String>,
    pub is_cumulative: Option<bool>,
    pub is_enabled: Option<bool>,
    pub requires_coupon_code: Option<bool>,
    pub reused: Option<bool>,
    pub start_date_utc: Option<DateTime<Utc>>,
    pub end_date_utc: Option<DateTime<Utc>>,
    pub discount_limitation: Option<DiscountLimitationType>,
    pub limitation_times: Option<u32>,
    pub maximum_discounted_quantity: Option<u32>,
    pub calculate_by_plugin: Option<bool>,
    pub discount_plugin_name: Option<String>,
    pub stores: Option<Vec<i64>>,
}

/// Update discount payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscountUpdate {
    pub name: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub assigned_entity_ids: Option<Vec<i64>>,
    pub use_percentage: Option<bool>,
    pub discount_percentage: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub maximum_discount_amount: Option<Decimal>,
    pub currency_code: Option<String>,
    pub is_cumulative: Option<bool>,
    pub is_enabled: Option<bool>,
    pub requires_coupon_code: Option<bool>,
    pub reused: Option<bool>,
    pub start_date_utc: Option<DateTime<Utc>>,
    pub end_date_utc: Option<DateTime<Utc>>,
    pub discount_limitation: Option<DiscountLimitationType>,
    pub limitation_times: Option<u32>,
    pub maximum_discounted_quantity: Option<u32>,
    pub calculate_by_plugin: Option<bool>,
    pub discount_plugin_name: Option<String>,
    pub stores: Option<Vec<i64>>,
}

impl Discount {
    /// Build a new discount from a create payload
    pub fn from_create(id: i64, data: DiscountCreate, created_at: i64) -> Self {
        let stores = data.stores.unwrap_or_default();
        Self {
            id,
            name: data.name,
            discount_type: data
                .discount_type
                .unwrap_or(DiscountType::AssignedToAllProducts),
            assigned_entity_ids: data.assigned_entity_ids.unwrap_or_default(),
            use_percentage: data.use_percentage.unwrap_or(false),
            discount_percentage: data.discount_percentage.unwrap_or_default(),
            discount_amount: data.discount_amount.unwrap_or_default(),
            maximum_discount_amount: data.maximum_discount_amount,
            currency_code: data.currency_code,
            is_cumulative: data.is_cumulative.unwrap_or(false),
            is_enabled: data.is_enabled.unwrap_or(true),
            requires_coupon_code: data.requires_coupon_code.unwrap_or(false),
            reused: data.reused.unwrap_or(false),
            start_date_utc: data.start_date_utc,
            end_date_utc: data.end_date_utc,
            discount_limitation: data.discount_limitation.unwrap_or_default(),
            limitation_times: data.limitation_times.unwrap_or(0),
            maximum_discounted_quantity: data.maximum_discounted_quantity,
            calculate_by_plugin: data.calculate_by_plugin.unwrap_or(false),
            discount_plugin_name: data.discount_plugin_name,
            limited_to_stores: !stores.is_empty(),
            stores,
            created_at,
        }
    }

    /// Merge an update payload into this discount
    pub fn apply_update(&mut self, data: DiscountUpdate) {
        if let Some(v) = data.name {
            self.name = v;
        }
        if let Some(v) = data.discount_type {
            self.discount_type = v;
        }
        if let Some(v) = data.assigned_entity_ids {
            self.assigned_entity_ids = v;
        }
        if let Some(v) = data.use_percentage {
            self.use_percentage = v;
        }
        if let Some(v) = data.discount_percentage {
            self.discount_percentage = v;
        }
        if let Some(v) = data.discount_amount {
            self.discount_amount = v;
        }
        if data.maximum_discount_amount.is_some() {
            self.maximum_discount_amount = data.maximum_discount_amount;
        }
        if data.currency_code.is_some() {
            self.currency_code = data.currency_code;
        }
        if let Some(v) = data.is_cumulative {
            self.is_cumulative = v;
        }
        if let Some(v) = data.is_enabled {
            self.is_enabled = v;
        }
        if let Some(v) = data.requires_coupon_code {
            self.requires_coupon_code = v;
        }
        if let Some(v) = data.reused {
            self.reused = v;
        }
        if data.start_date_utc.is_some() {
            self.start_date_utc = data.start_date_utc;
        }
        if data.end_date_utc.is_some() {
            self.end_date_utc = data.end_date_utc;
        }
        if let Some(v) = data.discount_limitation {
            self.discount_limitation = v;
        }
        if let Some(v) = data.limitation_times {
            self.limitation_times = v;
        }
        if data.maximum_discounted_quantity.is_some() {
            self.maximum_discounted_quantity = data.maximum_discounted_quantity;
        }
        if let Some(v) = data.calculate_by_plugin {
            self.calculate_by_plugin = v;
        }
        if data.discount_plugin_name.is_some() {
            self.discount_plugin_name = data.discount_plugin_name;
        }
        if let Some(v) = data.stores {
            self.limited_to_stores = !v.is_empty();
            self.stores = v;
        }
    }
}

/// Discount coupon entity (优惠券码)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountCoupon {
    pub id: i64,
    pub coupon_code: String,
    pub discount_id: i64,
    pub used: bool,
}

/// Discount usage history record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountUsageHistory {
    pub id: i64,
    pub discount_id: i64,
    pub customer_id: i64,
    pub order_id: i64,
    pub coupon_code: Option<String>,
    pub created_on_utc: DateTime<Utc>,
    pub canceled: bool,
}

/// Discount applied to a cart/order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplyDiscount {
    pub discount_id: i64,
    pub is_cumulative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl ApplyDiscount {
    /// Create from a discount, with the coupon code that unlocked it (if any)
    pub fn from_discount(discount: &Discount, coupon_code: Option<String>) -> Self {
        Self {
            discount_id: discount.id,
            is_cumulative: discount.is_cumulative,
            coupon_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_create_defaults() {
        let discount = Discount::from_create(
            7,
            DiscountCreate {
                name: "spring".to_string(),
                discount_amount: Some(dec!(5)),
                ..Default::default()
            },
            0,
        );

        assert_eq!(discount.id, 7);
        assert_eq!(discount.discount_type, DiscountType::AssignedToAllProducts);
        assert_eq!(discount.discount_amount, dec!(5));
        assert!(discount.is_enabled);
        assert!(!discount.is_cumulative);
        assert!(!discount.limited_to_stores);
        assert_eq!(discount.discount_limitation, DiscountLimitationType::Unlimited);
    }

    #[test]
    fn test_apply_update_merges_fields() {
        let mut discount = Discount::from_create(
            1,
            DiscountCreate {
                name: "a".to_string(),
                ..Default::default()
            },
            0,
        );

        discount.apply_update(DiscountUpdate {
            name: Some("b".to_string()),
            is_cumulative: Some(true),
            stores: Some(vec![3]),
            ..Default::default()
        });

        assert_eq!(discount.name, "b");
        assert!(discount.is_cumulative);
        assert!(discount.limited_to_stores);
        assert_eq!(discount.stores, vec![3]);
    }

    #[test]
    fn test_discount_type_serde() {
        let json = serde_json::to_string(&DiscountType::AssignedToSkus).unwrap();
        assert_eq!(json, "\"ASSIGNED_TO_SKUS\"");
    }
}
