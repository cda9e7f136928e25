//! Discount validation (折扣校验)
//!
//! Checks that need only the discount itself live here; coupon and usage
//! checks need the repositories and run in [`super::DiscountService`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Currency, Discount};
use thiserror::Error;

/// Why a discount does not apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    #[error("discount is disabled")]
    Disabled,
    #[error("discount has not started yet")]
    NotStarted,
    #[error("discount has expired")]
    Expired,
    #[error("discount is not available in this store")]
    StoreNotAllowed,
    #[error("discount currency does not match")]
    CurrencyMismatch,
    #[error("a valid coupon code is required")]
    CouponRequired,
    #[error("discount usage limit reached")]
    UsageLimitReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountValidationResult {
    pub is_valid: bool,
    pub reason: Option<InvalidReason>,
    /// Coupon that satisfied the coupon requirement
    pub coupon_code: Option<String>,
}

impl DiscountValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
            coupon_code: None,
        }
    }

    pub fn valid_with_coupon(coupon_code: impl Into<String>) -> Self {
        Self {
            coupon_code: Some(coupon_code.into()),
            ..Self::valid()
        }
    }

    pub fn invalid(reason: InvalidReason) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason),
            coupon_code: None,
        }
    }
}

/// Date window: inclusive start, inclusive end
pub fn is_active_at(discount: &Discount, now: DateTime<Utc>) -> bool {
    check_date_window(discount, now).is_none()
}

fn check_date_window(discount: &Discount, now: DateTime<Utc>) -> Option<InvalidReason> {
    if discount.start_date_utc.is_some_and(|start| start > now) {
        return Some(InvalidReason::NotStarted);
    }
    if discount.end_date_utc.is_some_and(|end| end < now) {
        return Some(InvalidReason::Expired);
    }
    None
}

/// Enabled flag, date window, store limitation and currency
pub fn check_discount(
    discount: &Discount,
    store_id: i64,
    currency: &Currency,
    now: DateTime<Utc>,
) -> Option<InvalidReason> {
    if !discount.is_enabled {
        return Some(InvalidReason::Disabled);
    }
    if let Some(reason) = check_date_window(discount, now) {
        return Some(reason);
    }
    if discount.limited_to_stores && !discount.stores.contains(&store_id) {
        return Some(InvalidReason::StoreNotAllowed);
    }
    match discount.currency_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() && !currency.matches_code(code) => {
            Some(InvalidReason::CurrencyMismatch)
        }
        _ => None,
    }
}
