//! EU-VAT rules
//!
//! Who counts as an EU consumer, and when a sale is VAT exempt.

use crate::core::TaxSettings;
use crate::db::repository::CountryRepository;
use crate::services::GeoLookup;
use shared::models::{Address, Country, Customer, VatNumberStatus};
use std::sync::Arc;

#[derive(Clone)]
pub struct EuVatRules {
    settings: TaxSettings,
    countries: CountryRepository,
    geo: Arc<dyn GeoLookup>,
}

impl EuVatRules {
    pub fn new(settings: TaxSettings, countries: CountryRepository, geo: Arc<dyn GeoLookup>) -> Self {
        Self {
            settings,
            countries,
            geo,
        }
    }

    /// Customer country: billing address, then registered country, then
    /// IP geolocation when enabled
    pub async fn customer_country(&self, customer: &Customer) -> Option<Country> {
        let billing_country_id = customer
            .billing_address
            .as_ref()
            .and_then(|a| a.country_id);

        for country_id in [billing_country_id, customer.country_id].into_iter().flatten() {
            if let Some(country) = self.country_by_id(country_id).await {
                return Some(country);
            }
        }

        if !self.settings.get_country_by_ip_address {
            return None;
        }
        let ip = customer.last_ip_address.as_deref()?;
        let iso_code = self.geo.lookup_country_iso_code(ip)?;
        match self.countries.find_by_two_letter_iso_code(&iso_code).await {
            Ok(country) => country,
            Err(e) => {
                tracing::warn!(iso_code = %iso_code, error = %e, "Country lookup by IP failed");
                None
            }
        }
    }

    /// A private individual resident in a VAT country. A customer with a
    /// validated VAT number is a business.
    pub async fn is_eu_consumer(&self, customer: &Customer) -> bool {
        match self.customer_country(customer).await {
            Some(country) if country.subject_to_vat => {
                customer.vat_number_status != VatNumberStatus::Valid
            }
            _ => false,
        }
    }

    /// VAT is not charged when the address is outside the VAT area, or
    /// when an EU business outside the shop country supplied a validated
    /// VAT number and exemption is allowed
    pub async fn is_vat_exempt(&self, address: Option<&Address>, customer: &Customer) -> bool {
        if !self.settings.eu_vat_enabled {
            return false;
        }
        let Some(country_id) = address.and_then(|a| a.country_id) else {
            return false;
        };
        let Some(country) = self.country_by_id(country_id).await else {
            return false;
        };

        if !country.subject_to_vat {
            return true;
        }

        Some(country.id) != self.settings.eu_vat_shop_country_id
            && customer.vat_number_status == VatNumberStatus::Valid
            && self.settings.eu_vat_allow_vat_exemption
    }

    async fn country_by_id(&self, country_id: i64) -> Option<Country> {
        match self.countries.find_by_id(country_id).await {
            Ok(country) => country,
            Err(e) => {
                tracing::warn!(country_id, error = %e, "Country lookup failed");
                None
            }
        }
    }
}
