//! Price Conversion Module
//!
//! Tax-inclusive / tax-exclusive conversion of prices and order lines.

mod calculator;

pub use calculator::*;
