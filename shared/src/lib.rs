//! Shared types for the storefront pricing workspace
//!
//! Domain models (customers, products, discounts, tax categories, VAT
//! requests) and the unified error system used across crates.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
