//! Product Model

use serde::{Deserialize, Serialize};

/// Product as seen by the tax and discount paths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub tax_category_id: Option<i64>,
    #[serde(default)]
    pub is_tax_exempt: bool,
    /// Telecommunications, broadcasting or electronic services (EU VAT 2015 rules)
    #[serde(default)]
    pub is_tele_broad_electronic_service: bool,
    /// Discount IDs assigned directly to this product
    #[serde(default)]
    pub applied_discounts: Vec<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub collection_ids: Vec<i64>,
    pub vendor_id: Option<i64>,
}

/// Checkout attribute (e.g. gift wrapping) with its own tax settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CheckoutAttribute {
    pub id: i64,
    pub name: String,
    pub tax_category_id: Option<i64>,
    #[serde(default)]
    pub is_tax_exempt: bool,
}
