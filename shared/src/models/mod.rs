//! Data models
//!
//! Shared by the pricing engine and any storefront consuming it.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]).
//! Monetary values are `rust_decimal::Decimal`.

pub mod address;
pub mod currency;
pub mod customer;
pub mod discount;
pub mod product;
pub mod tax;
pub mod vat;

// Re-exports
pub use address::*;
pub use currency::*;
pub use customer::*;
pub use discount::*;
pub use product::*;
pub use tax::*;
pub use vat::*;
