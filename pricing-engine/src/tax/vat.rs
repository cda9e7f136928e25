//! VAT number validation
//!
//! Parses `CC123...` numbers and optionally checks them against a remote
//! service. Remote failures never propagate: they become
//! [`VatNumberStatus::Unknown`] with the error attached.

use async_trait::async_trait;
use regex::Regex;
use shared::models::{VatNumberStatus, VatRequest, VatResponse};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use thiserror::Error;

static VAT_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w{2})(.*)").expect("valid VAT number pattern"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VatCheckError {
    #[error("VAT service request failed: {0}")]
    Request(String),

    #[error("VAT service returned HTTP {0}")]
    Status(u16),

    #[error("Invalid VAT service response: {0}")]
    Response(String),

    #[error("VAT service timed out after {0:?}")]
    Timeout(Duration),
}

/// Remote VAT number checker
#[async_trait]
pub trait VatChecker: Send + Sync {
    async fn check_vat(&self, request: &VatRequest) -> Result<VatResponse, VatCheckError>;
}

/// Checker that answers every request with an empty (not valid) response
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVatChecker;

#[async_trait]
impl VatChecker for NullVatChecker {
    async fn check_vat(&self, _request: &VatRequest) -> Result<VatResponse, VatCheckError> {
        Ok(VatResponse::default())
    }
}

/// EU VIES REST checker
#[derive(Debug, Clone)]
pub struct ViesVatChecker {
    url: String,
    client: reqwest::Client,
}

impl ViesVatChecker {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VatChecker for ViesVatChecker {
    async fn check_vat(&self, request: &VatRequest) -> Result<VatResponse, VatCheckError> {
        let resp = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| VatCheckError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(VatCheckError::Status(resp.status().as_u16()));
        }

        resp.json::<VatResponse>()
            .await
            .map_err(|e| VatCheckError::Response(e.to_string()))
    }
}

/// Outcome of a VAT number check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatCheckResult {
    pub status: VatNumberStatus,
    pub name: Option<String>,
    pub address: Option<String>,
    /// Set when the remote check failed
    pub error: Option<VatCheckError>,
}

impl VatCheckResult {
    fn status(status: VatNumberStatus) -> Self {
        Self {
            status,
            name: None,
            address: None,
            error: None,
        }
    }
}

/// Split `"PL1234567890"` into `("PL", "1234567890")`
pub fn parse_vat_number(full_vat_number: &str) -> Option<(String, String)> {
    let caps = VAT_NUMBER_PATTERN.captures(full_vat_number.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[derive(Clone)]
pub struct VatService {
    checker: Arc<dyn VatChecker>,
    assume_valid: bool,
    use_web_service: bool,
    timeout: Duration,
}

impl VatService {
    pub fn new(
        checker: Arc<dyn VatChecker>,
        assume_valid: bool,
        use_web_service: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            checker,
            assume_valid,
            use_web_service,
            timeout,
        }
    }

    /// Status of a combined number such as `"DE123456789"`
    pub async fn get_vat_number_status(&self, full_vat_number: &str) -> VatCheckResult {
        if full_vat_number.trim().is_empty() {
            return VatCheckResult::status(VatNumberStatus::Empty);
        }
        match parse_vat_number(full_vat_number) {
            Some((iso_code, number)) => self.get_vat_number_status_for(&iso_code, &number).await,
            None => VatCheckResult::status(VatNumberStatus::Invalid),
        }
    }

    pub async fn get_vat_number_status_for(
        &self,
        two_letter_iso_code: &str,
        vat_number: &str,
    ) -> VatCheckResult {
        if two_letter_iso_code.trim().is_empty() || vat_number.trim().is_empty() {
            return VatCheckResult::status(VatNumberStatus::Empty);
        }
        if self.assume_valid {
            return VatCheckResult::status(VatNumberStatus::Valid);
        }
        if !self.use_web_service {
            return VatCheckResult::status(VatNumberStatus::Unknown);
        }
        self.do_vat_check(two_letter_iso_code, vat_number).await
    }

    /// Remote check; the service rejects lowercase country codes
    pub async fn do_vat_check(&self, two_letter_iso_code: &str, vat_number: &str) -> VatCheckResult {
        let request = VatRequest {
            country_code: two_letter_iso_code.trim().to_uppercase(),
            vat_number: vat_number.replace(' ', ""),
        };

        let outcome = match tokio::time::timeout(self.timeout, self.checker.check_vat(&request)).await
        {
            Ok(result) => result,
            Err(_) => Err(VatCheckError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(response) => VatCheckResult {
                status: if response.valid {
                    VatNumberStatus::Valid
                } else {
                    VatNumberStatus::Invalid
                },
                name: response.name,
                address: response.address,
                error: None,
            },
            Err(e) => {
                tracing::warn!(
                    country_code = %request.country_code,
                    error = %e,
                    "VAT number check failed"
                );
                VatCheckResult {
                    error: Some(e),
                    ..VatCheckResult::status(VatNumberStatus::Unknown)
                }
            }
        }
    }
}
