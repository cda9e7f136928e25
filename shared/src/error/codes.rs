//! Unified error codes for the pricing workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Tax errors
//! - 2xxx: Discount errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Tax ====================
    /// Tax category not found
    TaxCategoryNotFound = 1001,

    // ==================== 2xxx: Discount ====================
    /// Discount not found
    DiscountNotFound = 2001,
    /// Discount coupon not found
    DiscountCouponNotFound = 2002,
    /// Discount coupon code already exists
    DiscountCouponExists = 2003,
    /// Discount usage history record not found
    DiscountUsageNotFound = 2005,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Tax
            ErrorCode::TaxCategoryNotFound => "Tax category not found",

            // Discount
            ErrorCode::DiscountNotFound => "Discount not found",
            ErrorCode::DiscountCouponNotFound => "Discount coupon not found",
            ErrorCode::DiscountCouponExists => "Discount coupon code already exists",
            ErrorCode::DiscountUsageNotFound => "Discount usage history not found",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Tax
            1001 => Ok(ErrorCode::TaxCategoryNotFound),

            // Discount
            2001 => Ok(ErrorCode::DiscountNotFound),
            2002 => Ok(ErrorCode::DiscountCouponNotFound),
            2003 => Ok(ErrorCode::DiscountCouponExists),
            2005 => Ok(ErrorCode::DiscountUsageNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::TaxCategoryNotFound,
            ErrorCode::DiscountCouponExists,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::DiscountNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::DiscountCouponExists).unwrap();
        assert_eq!(json, "2003");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::DiscountCouponExists);
    }
}
