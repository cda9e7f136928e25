//! Customer Model

use super::address::Address;
use super::vat::VatNumberStatus;
use serde::{Deserialize, Serialize};

/// Customer group (客户分组)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_tax_exempt: bool,
}

/// Customer as seen by the pricing paths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Customer {
    pub id: i64,
    #[serde(default)]
    pub is_tax_exempt: bool,
    #[serde(default)]
    pub customer_groups: Vec<CustomerGroup>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    /// Country selected during registration
    pub country_id: Option<i64>,
    pub vat_number: Option<String>,
    #[serde(default)]
    pub vat_number_status: VatNumberStatus,
    pub last_ip_address: Option<String>,
    /// Coupon codes the customer entered
    #[serde(default)]
    pub coupon_codes: Vec<String>,
}

impl Customer {
    /// Whether the customer or any of its groups is tax exempt
    pub fn is_tax_exempt_any(&self) -> bool {
        self.is_tax_exempt || self.customer_groups.iter().any(|g| g.is_tax_exempt)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.customer_groups.iter().map(|g| g.id)
    }
}
