//! Currency Model

use serde::{Deserialize, Serialize};

/// Currency entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Currency {
    pub id: i64,
    pub name: String,
    /// ISO 4217 code
    pub currency_code: String,
}

impl Currency {
    pub fn new(id: i64, name: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            currency_code: currency_code.into(),
        }
    }

    /// Case-insensitive code comparison
    pub fn matches_code(&self, code: &str) -> bool {
        self.currency_code.eq_ignore_ascii_case(code)
    }
}
