//! VAT number validation types

use serde::{Deserialize, Serialize};

/// VAT number validation status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatNumberStatus {
    #[default]
    Unknown,
    Empty,
    Valid,
    Invalid,
}

/// Request sent to the remote VAT checker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VatRequest {
    pub country_code: String,
    pub vat_number: String,
}

/// Response of the remote VAT checker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VatResponse {
    pub valid: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
