//! Tax Category Model

use serde::{Deserialize, Serialize};

/// Tax category entity (税种)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxCategory {
    pub id: i64,
    pub name: String,
    pub display_order: i32,
}

/// Create tax category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCategoryCreate {
    pub name: String,
    pub display_order: Option<i32>,
}

/// Update tax category payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaxCategoryUpdate {
    pub name: Option<String>,
    pub display_order: Option<i32>,
}
