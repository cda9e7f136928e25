//! Work context - the customer and store a calculation runs for

use shared::models::{Currency, Customer};

/// Explicit per-request context, passed into every engine call that
/// needs to know "who" and "where".
#[derive(Debug, Clone)]
pub struct WorkContext {
    pub customer: Customer,
    pub store_id: i64,
    pub currency: Currency,
}

impl WorkContext {
    pub fn new(customer: Customer, store_id: i64, currency: Currency) -> Self {
        Self {
            customer,
            store_id,
            currency,
        }
    }
}
