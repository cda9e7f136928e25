//! Discount Handler Service
//!
//! Gathers the discounts applicable to a product and folds them into one
//! amount: cumulative discounts stack, otherwise the single best one wins.

use super::provider::DiscountAmountProvider;
use super::service::DiscountService;
use crate::core::CatalogSettings;
use crate::utils::money::percent_of;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use shared::models::{ApplyDiscount, Currency, Customer, Discount, DiscountType, Product};
use std::sync::Arc;

/// One discount's contribution to a preferred discount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub discount: ApplyDiscount,
    /// Per-unit amount
    pub amount: Decimal,
    pub maximum_discounted_quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredDiscount {
    pub applied: Vec<AppliedDiscount>,
    /// Per-unit amount
    pub amount: Decimal,
}

/// Unit and line price after the preferred discount
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountedPrice {
    pub unit_price: Decimal,
    /// Per-unit discount, capped at the unit price
    pub discount_amount: Decimal,
    pub sub_total: Decimal,
    /// Whole-line discount, honoring maximum discounted quantities
    pub sub_total_discount: Decimal,
    pub applied_discounts: Vec<ApplyDiscount>,
}

#[derive(Clone)]
pub struct DiscountHandlerService {
    discounts: DiscountService,
    catalog: CatalogSettings,
    providers: Vec<Arc<dyn DiscountAmountProvider>>,
}

impl DiscountHandlerService {
    pub fn new(
        discounts: DiscountService,
        catalog: CatalogSettings,
        providers: Vec<Arc<dyn DiscountAmountProvider>>,
    ) -> Self {
        Self {
            discounts,
            catalog,
            providers,
        }
    }

    pub fn load_discount_provider_by_system_name(
        &self,
        system_name: &str,
    ) -> Option<Arc<dyn DiscountAmountProvider>> {
        let system_name = system_name.trim();
        self.providers
            .iter()
            .find(|p| p.system_name().eq_ignore_ascii_case(system_name))
            .cloned()
    }

    // ========== Allowed discounts ==========

    /// Valid discounts for a product: SKU-assigned, global, and those bound
    /// to the product's categories, brand, collections or vendor
    pub async fn get_allowed_discounts(
        &self,
        product: &Product,
        customer: &Customer,
        store_id: i64,
        currency: &Currency,
    ) -> AppResult<Vec<ApplyDiscount>> {
        if self.catalog.ignore_discounts {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<Discount> = Vec::new();

        for discount_id in &product.applied_discounts {
            match self.discounts.get_discount_by_id(*discount_id).await? {
                Some(d) if d.discount_type == DiscountType::AssignedToSkus => candidates.push(d),
                Some(_) => {}
                None => tracing::debug!(discount_id, "Applied discount no longer exists"),
            }
        }

        candidates.extend(
            self.discounts
                .get_all_discounts(Some(DiscountType::AssignedToAllProducts), false)
                .await?,
        );

        let brand_ids: Vec<i64> = product.brand_id.into_iter().collect();
        let vendor_ids: Vec<i64> = product.vendor_id.into_iter().collect();
        let assignments = [
            (DiscountType::AssignedToCategories, product.category_ids.as_slice()),
            (DiscountType::AssignedToBrands, brand_ids.as_slice()),
            (DiscountType::AssignedToCollections, product.collection_ids.as_slice()),
            (DiscountType::AssignedToVendors, vendor_ids.as_slice()),
        ];
        for (discount_type, entity_ids) in assignments {
            candidates.extend(
                self.discounts
                    .get_discounts_assigned_to(discount_type, entity_ids)
                    .await?,
            );
        }

        let mut allowed: Vec<ApplyDiscount> = Vec::new();
        for discount in candidates {
            if allowed.iter().any(|a| a.discount_id == discount.id) {
                continue;
            }
            let validation = self
                .discounts
                .validate_discount(&discount, customer, store_id, currency)
                .await?;
            if validation.is_valid {
                allowed.push(ApplyDiscount::from_discount(&discount, validation.coupon_code));
            }
        }
        Ok(allowed)
    }

    // ========== Preferred discount ==========

    /// Fold candidates into one amount.
    ///
    /// Any cumulative candidate: the sum of all cumulative amounts (the
    /// non-cumulative ones are ignored). Otherwise the single largest
    /// non-cumulative amount.
    pub async fn get_preferred_discount(
        &self,
        apply_discounts: &[ApplyDiscount],
        customer: &Customer,
        currency: &Currency,
        product: Option<&Product>,
        amount: Decimal,
    ) -> AppResult<PreferredDiscount> {
        let any_cumulative = apply_discounts.iter().any(|a| a.is_cumulative);

        let mut evaluated = Vec::new();
        for apply in apply_discounts.iter().filter(|a| a.is_cumulative == any_cumulative) {
            let Some(discount) = self.discounts.get_discount_by_id(apply.discount_id).await? else {
                tracing::warn!(discount_id = apply.discount_id, "Discount not found, skipped");
                continue;
            };
            // snapshot taken under another currency
            if discount
                .currency_code
                .as_deref()
                .is_some_and(|code| !code.trim().is_empty() && !currency.matches_code(code.trim()))
            {
                continue;
            }
            let discount_amount = self
                .get_discount_amount(&discount, customer, product, amount)
                .await;
            evaluated.push(AppliedDiscount {
                discount: apply.clone(),
                amount: discount_amount,
                maximum_discounted_quantity: discount.maximum_discounted_quantity,
            });
        }

        if any_cumulative {
            let amount = evaluated.iter().map(|a| a.amount).sum();
            return Ok(PreferredDiscount {
                applied: evaluated,
                amount,
            });
        }

        // first of equal maxima wins
        let best = evaluated
            .into_iter()
            .fold(None::<AppliedDiscount>, |best, candidate| match best {
                Some(b) if b.amount >= candidate.amount => Some(b),
                _ => Some(candidate),
            });
        Ok(match best {
            Some(b) => PreferredDiscount {
                amount: b.amount,
                applied: vec![b],
            },
            None => PreferredDiscount::default(),
        })
    }

    // ========== Amount ==========

    /// Per-unit amount of one discount, never negative
    pub async fn get_discount_amount(
        &self,
        discount: &Discount,
        customer: &Customer,
        product: Option<&Product>,
        amount: Decimal,
    ) -> Decimal {
        let result = if discount.calculate_by_plugin {
            let name = discount.discount_plugin_name.as_deref().unwrap_or_default();
            match self.load_discount_provider_by_system_name(name) {
                Some(provider) => {
                    provider
                        .discount_amount(discount, customer, product, amount)
                        .await
                }
                None => {
                    tracing::warn!(
                        discount_id = discount.id,
                        plugin = name,
                        "Discount amount provider not found"
                    );
                    Decimal::ZERO
                }
            }
        } else if discount.use_percentage {
            let value = percent_of(amount, discount.discount_percentage);
            match discount.maximum_discount_amount {
                Some(max) => value.min(max),
                None => value,
            }
        } else {
            discount.discount_amount
        };

        result.max(Decimal::ZERO)
    }

    // ========== Discounted price ==========

    /// Apply the preferred allowed discount to a unit price and a line of
    /// `quantity` units
    ///
    /// A negative unit price is clamped to 0 here; tax conversion passes
    /// negative prices through unchanged.
    pub async fn get_discounted_price(
        &self,
        product: &Product,
        customer: &Customer,
        store_id: i64,
        currency: &Currency,
        unit_price: Decimal,
        quantity: u32,
    ) -> AppResult<DiscountedPrice> {
        let allowed = self
            .get_allowed_discounts(product, customer, store_id, currency)
            .await?;
        let preferred = self
            .get_preferred_discount(&allowed, customer, currency, Some(product), unit_price)
            .await?;

        let unit_price = unit_price.max(Decimal::ZERO);
        let quantity_dec = Decimal::from(quantity);
        let line_total = unit_price * quantity_dec;

        let discount_amount = preferred.amount.min(unit_price);
        let sub_total_discount =
            line_discount(&preferred.applied, unit_price, quantity).min(line_total);

        Ok(DiscountedPrice {
            unit_price: unit_price - discount_amount,
            discount_amount,
            sub_total: line_total - sub_total_discount,
            sub_total_discount,
            applied_discounts: preferred.applied.into_iter().map(|a| a.discount).collect(),
        })
    }
}

/// Whole-line discount. Each discount covers only its first
/// `maximum_discounted_quantity` units, and no unit is discounted below 0.
fn line_discount(applied: &[AppliedDiscount], unit_price: Decimal, quantity: u32) -> Decimal {
    let covered_units =
        |a: &AppliedDiscount| a.maximum_discounted_quantity.map_or(quantity, |max| max.min(quantity));

    let mut breakpoints: Vec<u32> = applied.iter().map(covered_units).collect();
    breakpoints.push(quantity);
    breakpoints.sort_unstable();
    breakpoints.dedup();

    // units in (start, end] share the same set of covering discounts
    let mut total = Decimal::ZERO;
    let mut start = 0;
    for end in breakpoints {
        if end == start {
            continue;
        }
        let per_unit: Decimal = applied
            .iter()
            .filter(|&a| covered_units(a) >= end)
            .map(|a| a.amount)
            .sum();
        total += per_unit.min(unit_price) * Decimal::from(end - start);
        start = end;
    }
    total
}
