//! Tax Service
//!
//! Resolves `(tax_rate, is_taxable)` for a product and customer, and
//! converts prices between their tax-inclusive and tax-exclusive forms.
//!
//! # 流程
//!
//! 1. No active provider: rate 0, taxable
//! 2. Taxable address from `TaxBasedOn` (EU consumers buying electronic
//!    services are always taxed at their billing address)
//! 3. Exemptions: product, customer / customer group, EU-VAT
//! 4. Provider call, bounded by the provider timeout

use super::eu_vat::EuVatRules;
use super::provider::{TaxProvider, TaxRequest};
use super::registry::TaxProviderRegistry;
use crate::core::{TaxBasedOn, TaxSettings, WorkContext};
use crate::pricing::{LineAmounts, PriceCalculator, TaxProductPrice, TaxedPrice};
use rust_decimal::Decimal;
use shared::models::{Address, CheckoutAttribute, Customer, Product};
use std::sync::Arc;
use std::time::Duration;

/// Resolved tax outcome for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate {
    /// Provider rate; kept even when not taxable so embedded tax can be
    /// stripped from inclusive prices
    pub tax_rate: Decimal,
    pub is_taxable: bool,
}

impl TaxRate {
    fn untaxed() -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            is_taxable: true,
        }
    }

    /// Rate as reported to callers (0 when not taxable)
    pub fn effective_rate(&self) -> Decimal {
        if self.is_taxable {
            self.tax_rate
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Clone)]
pub struct TaxService {
    registry: Arc<TaxProviderRegistry>,
    settings: TaxSettings,
    eu_vat: EuVatRules,
    calculator: PriceCalculator,
    provider_timeout: Duration,
}

impl TaxService {
    pub fn new(
        registry: Arc<TaxProviderRegistry>,
        settings: TaxSettings,
        eu_vat: EuVatRules,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            calculator: PriceCalculator::from_settings(&settings),
            settings,
            eu_vat,
            provider_timeout,
        }
    }

    pub fn settings(&self) -> &TaxSettings {
        &self.settings
    }

    pub fn calculator(&self) -> &PriceCalculator {
        &self.calculator
    }

    // ========== Tax rate ==========

    /// Tax rate and taxability for a product (or a product-less charge such
    /// as shipping) bought by `customer`. Provider selection, the exemption
    /// checks and the taxable address all use `customer`; `ctx` contributes
    /// only the store.
    pub async fn get_tax_rate(
        &self,
        ctx: &WorkContext,
        product: Option<&Product>,
        tax_category_id: Option<i64>,
        customer: &Customer,
        price: Decimal,
    ) -> TaxRate {
        let Some(provider) = self
            .registry
            .load_active_tax_provider_for(customer, ctx.store_id)
        else {
            tracing::debug!("No active tax provider, using zero tax");
            return TaxRate::untaxed();
        };

        let request = self
            .create_tax_request(ctx, product, tax_category_id, customer, price)
            .await;

        let mut is_taxable = !self.is_tax_exempt(product, customer);
        if is_taxable
            && self.settings.eu_vat_enabled
            && self
                .eu_vat
                .is_vat_exempt(request.address.as_ref(), customer)
                .await
        {
            is_taxable = false;
        }

        let tax_rate = self.call_provider(provider.as_ref(), &request).await;
        TaxRate {
            tax_rate,
            is_taxable,
        }
    }

    async fn create_tax_request(
        &self,
        ctx: &WorkContext,
        product: Option<&Product>,
        tax_category_id: Option<i64>,
        customer: &Customer,
        price: Decimal,
    ) -> TaxRequest {
        let tax_category_id = tax_category_id.or_else(|| product.and_then(|p| p.tax_category_id));
        let address = self.taxable_address(product, customer).await;
        TaxRequest {
            customer: customer.clone(),
            product: product.cloned(),
            price,
            tax_category_id,
            address,
            store_id: ctx.store_id,
        }
    }

    /// Address whose jurisdiction applies
    pub async fn taxable_address(
        &self,
        product: Option<&Product>,
        customer: &Customer,
    ) -> Option<Address> {
        let mut based_on = self.settings.tax_based_on;

        let electronic_service = product.is_some_and(|p| p.is_tele_broad_electronic_service);
        if self.settings.eu_vat_enabled
            && electronic_service
            && self.eu_vat.is_eu_consumer(customer).await
        {
            based_on = TaxBasedOn::BillingAddress;
        }

        match based_on {
            TaxBasedOn::BillingAddress if customer.billing_address.is_some() => {
                customer.billing_address.clone()
            }
            TaxBasedOn::ShippingAddress if customer.shipping_address.is_some() => {
                customer.shipping_address.clone()
            }
            _ => self.settings.default_tax_address.clone(),
        }
    }

    fn is_tax_exempt(&self, product: Option<&Product>, customer: &Customer) -> bool {
        product.is_some_and(|p| p.is_tax_exempt) || customer.is_tax_exempt_any()
    }

    async fn call_provider(&self, provider: &dyn TaxProvider, request: &TaxRequest) -> Decimal {
        let result =
            match tokio::time::timeout(self.provider_timeout, provider.get_tax_rate(request)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!(
                        provider = provider.system_name(),
                        timeout_ms = self.provider_timeout.as_millis() as u64,
                        "Tax provider timed out"
                    );
                    return Decimal::ZERO;
                }
            };

        if !result.is_success() {
            for error in &result.errors {
                tracing::error!(provider = provider.system_name(), error = %error, "Tax provider error");
            }
            return Decimal::ZERO;
        }
        result.tax_rate.max(Decimal::ZERO)
    }

    // ========== Product price ==========

    /// Product price using the store's "prices include tax" setting
    pub async fn get_product_price(
        &self,
        ctx: &WorkContext,
        product: &Product,
        price: Decimal,
        including_tax: bool,
        customer: &Customer,
    ) -> TaxedPrice {
        self.get_product_price_with(
            ctx,
            Some(product),
            None,
            price,
            including_tax,
            customer,
            self.settings.prices_include_tax,
        )
        .await
    }

    /// Product price with explicit tax category and inclusion flag
    #[allow(clippy::too_many_arguments)]
    pub async fn get_product_price_with(
        &self,
        ctx: &WorkContext,
        product: Option<&Product>,
        tax_category_id: Option<i64>,
        price: Decimal,
        including_tax: bool,
        customer: &Customer,
        price_includes_tax: bool,
    ) -> TaxedPrice {
        let rate = self
            .get_tax_rate(ctx, product, tax_category_id, customer, price)
            .await;
        self.calculator.convert(
            price,
            rate.tax_rate,
            price_includes_tax,
            including_tax,
            rate.is_taxable,
        )
    }

    /// Order-line breakdown with inclusive and exclusive amounts
    pub async fn get_tax_product_price(
        &self,
        ctx: &WorkContext,
        product: &Product,
        customer: &Customer,
        amounts: &LineAmounts,
    ) -> TaxProductPrice {
        let rate = self
            .get_tax_rate(ctx, Some(product), None, customer, amounts.unit_price)
            .await;
        self.calculator.line_breakdown(
            amounts,
            rate.tax_rate,
            self.settings.prices_include_tax,
            rate.is_taxable,
        )
    }

    // ========== Shipping / payment fee / checkout attribute ==========

    pub async fn get_shipping_price(
        &self,
        ctx: &WorkContext,
        price: Decimal,
        including_tax: bool,
        customer: &Customer,
    ) -> TaxedPrice {
        if !self.settings.shipping_is_taxable {
            return TaxedPrice {
                price,
                tax_rate: Decimal::ZERO,
            };
        }
        self.get_product_price_with(
            ctx,
            None,
            self.settings.shipping_tax_category_id,
            price,
            including_tax,
            customer,
            self.settings.shipping_price_includes_tax,
        )
        .await
    }

    pub async fn get_payment_method_additional_fee(
        &self,
        ctx: &WorkContext,
        fee: Decimal,
        including_tax: bool,
        customer: &Customer,
    ) -> TaxedPrice {
        if !self.settings.payment_method_additional_fee_is_taxable {
            return TaxedPrice {
                price: fee,
                tax_rate: Decimal::ZERO,
            };
        }
        self.get_product_price_with(
            ctx,
            None,
            self.settings.payment_method_additional_fee_tax_category_id,
            fee,
            including_tax,
            customer,
            self.settings.payment_method_additional_fee_includes_tax,
        )
        .await
    }

    pub async fn get_checkout_attribute_price(
        &self,
        ctx: &WorkContext,
        attribute: &CheckoutAttribute,
        price: Decimal,
        including_tax: bool,
        customer: &Customer,
    ) -> TaxedPrice {
        if attribute.is_tax_exempt {
            return TaxedPrice {
                price,
                tax_rate: Decimal::ZERO,
            };
        }
        self.get_product_price_with(
            ctx,
            None,
            attribute.tax_category_id,
            price,
            including_tax,
            customer,
            self.settings.prices_include_tax,
        )
        .await
    }
}
