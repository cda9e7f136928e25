//! Address and Country Models

use serde::{Deserialize, Serialize};

/// Postal address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Address {
    pub id: i64,
    pub country_id: Option<i64>,
    pub state_province_id: Option<i64>,
    pub city: Option<String>,
    pub zip_postal_code: Option<String>,
    pub address1: Option<String>,
    pub company: Option<String>,
}

/// Country entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub name: String,
    /// ISO 3166-1 alpha-2 code
    pub two_letter_iso_code: String,
    /// Whether the country belongs to the EU VAT area
    pub subject_to_vat: bool,
}
