//! Discounts Module (折扣)
//!
//! - [`DiscountService`] - discount, coupon and usage history persistence
//!   and validation
//! - [`DiscountHandlerService`] - allowed / preferred discount resolution
//! - [`DiscountAmountProvider`] - plugin contract for computed amounts

pub mod handler;
pub mod provider;
pub mod service;
pub mod validation;

pub use handler::{AppliedDiscount, DiscountHandlerService, DiscountedPrice, PreferredDiscount};
pub use provider::DiscountAmountProvider;
pub use service::{DiscountService, DiscountUsage};
pub use validation::{DiscountValidationResult, InvalidReason};
