//! Tax Module
//!
//! - [`TaxProviderRegistry`] - active provider selection
//! - [`TaxService`] - tax rate resolution and price conversion
//! - [`EuVatRules`] - EU consumer and VAT exemption rules
//! - [`VatService`] - VAT number validation
//! - [`TaxCategoryService`] - tax category CRUD

pub mod eu_vat;
pub mod fixed_rate;
pub mod provider;
pub mod registry;
pub mod service;
pub mod tax_category;
pub mod vat;

pub use eu_vat::EuVatRules;
pub use fixed_rate::{FIXED_RATE_SYSTEM_NAME, FixedRateTaxProvider};
pub use provider::{TaxProvider, TaxRateResult, TaxRequest};
pub use registry::TaxProviderRegistry;
pub use service::{TaxRate, TaxService};
pub use tax_category::TaxCategoryService;
pub use vat::{
    NullVatChecker, VatCheckError, VatCheckResult, VatChecker, VatService, ViesVatChecker,
    parse_vat_number,
};
