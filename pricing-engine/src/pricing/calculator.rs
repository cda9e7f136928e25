//! Price Calculator
//!
//! Conversion between tax-inclusive and tax-exclusive prices.
//! Pure functions over `Decimal`; rounding follows `TaxSettings`.

use crate::core::{MidpointRounding, TaxSettings};
use crate::utils::money::round_money;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// A converted price together with the tax rate it was converted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxedPrice {
    pub price: Decimal,
    /// Always 0 when the price is not taxable
    pub tax_rate: Decimal,
}

/// Inputs to an order-line price breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    pub unit_price_without_discount: Decimal,
    pub unit_price: Decimal,
    pub sub_total: Decimal,
    pub discount_amount: Decimal,
    pub quantity: u32,
}

/// Order-line price breakdown, every amount in both representations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProductPrice {
    pub unit_price_without_disc_incl_tax: Decimal,
    pub unit_price_without_disc_excl_tax: Decimal,
    pub unit_price_incl_tax: Decimal,
    pub unit_price_excl_tax: Decimal,
    pub sub_total_incl_tax: Decimal,
    pub sub_total_excl_tax: Decimal,
    pub discount_amount_incl_tax: Decimal,
    pub discount_amount_excl_tax: Decimal,
    pub tax_rate: Decimal,
    pub quantity: u32,
}

/// Stateless price converter (rounding settings only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCalculator {
    decimals: u32,
    rounding: MidpointRounding,
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(2, MidpointRounding::AwayFromZero)
    }
}

impl PriceCalculator {
    pub fn new(decimals: u32, rounding: MidpointRounding) -> Self {
        Self { decimals, rounding }
    }

    pub fn from_settings(settings: &TaxSettings) -> Self {
        Self::new(settings.calculate_round_price, settings.midpoint_rounding)
    }

    /// Add (`increase`) or strip `percent` tax from `price`.
    ///
    /// A zero percent returns the price untouched (no rounding); a computed
    /// zero returns exactly 0.
    pub fn calculate_price(&self, price: Decimal, percent: Decimal, increase: bool) -> Decimal {
        if percent.is_zero() {
            return price;
        }
        let factor = Decimal::ONE + percent / Decimal::ONE_HUNDRED;
        let result = if increase {
            price * factor
        } else {
            price / factor
        };
        if result.is_zero() {
            return Decimal::ZERO;
        }
        round_money(result, self.decimals, self.rounding)
    }

    /// Apply the inclusive/exclusive truth table to one price.
    ///
    /// | prices include tax | including tax | taxable | result |
    /// |---|---|---|---|
    /// | yes | yes | yes | unchanged |
    /// | yes | yes | no  | tax stripped |
    /// | yes | no  | any | tax stripped |
    /// | no  | yes | yes | tax added |
    /// | no  | yes | no  | unchanged |
    /// | no  | no  | any | unchanged |
    ///
    /// `tax_rate` is the provider rate even when not taxable; the returned
    /// rate is forced to 0 in that case. Negative prices pass through.
    pub fn convert(
        &self,
        price: Decimal,
        tax_rate: Decimal,
        price_includes_tax: bool,
        including_tax: bool,
        is_taxable: bool,
    ) -> TaxedPrice {
        let price = match (price_includes_tax, including_tax, is_taxable) {
            (true, true, true) => price,
            (true, _, _) => self.calculate_price(price, tax_rate, false),
            (false, true, true) => self.calculate_price(price, tax_rate, true),
            (false, _, _) => price,
        };
        TaxedPrice {
            price,
            tax_rate: if is_taxable { tax_rate } else { Decimal::ZERO },
        }
    }

    /// Both representations of every line amount
    pub fn line_breakdown(
        &self,
        amounts: &LineAmounts,
        tax_rate: Decimal,
        price_includes_tax: bool,
        is_taxable: bool,
    ) -> TaxProductPrice {
        let both = |amount: Decimal| {
            (
                self.convert(amount, tax_rate, price_includes_tax, true, is_taxable).price,
                self.convert(amount, tax_rate, price_includes_tax, false, is_taxable).price,
            )
        };

        let (unit_without_disc_incl, unit_without_disc_excl) =
            both(amounts.unit_price_without_discount);
        let (unit_incl, unit_excl) = both(amounts.unit_price);
        let (sub_total_incl, sub_total_excl) = both(amounts.sub_total);
        let (discount_incl, discount_excl) = both(amounts.discount_amount);

        TaxProductPrice {
            unit_price_without_disc_incl_tax: unit_without_disc_incl,
            unit_price_without_disc_excl_tax: unit_without_disc_excl,
            unit_price_incl_tax: unit_incl,
            unit_price_excl_tax: unit_excl,
            sub_total_incl_tax: sub_total_incl,
            sub_total_excl_tax: sub_total_excl,
            discount_amount_incl_tax: discount_incl,
            discount_amount_excl_tax: discount_excl,
            tax_rate: if is_taxable { tax_rate } else { Decimal::ZERO },
            quantity: amounts.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money_eq(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.01)
    }

    fn calc() -> PriceCalculator {
        PriceCalculator::default()
    }

    // ==================== calculate_price ====================

    #[test]
    fn test_zero_rate_is_identity() {
        for price in [dec!(0), dec!(19.999), dec!(-5.5), dec!(100)] {
            assert_eq!(calc().calculate_price(price, Decimal::ZERO, true), price);
            assert_eq!(calc().calculate_price(price, Decimal::ZERO, false), price);
        }
    }

    #[test]
    fn test_inclusive_exclusive_round_trip() {
        let rates = [dec!(5), dec!(7.7), dec!(19), dec!(20), dec!(23)];
        let prices = [dec!(0.01), dec!(1), dec!(9.99), dec!(10.01), dec!(123.45), dec!(9999.99)];
        for rate in rates {
            for price in prices {
                let gross = calc().calculate_price(price, rate, true);
                let net = calc().calculate_price(gross, rate, false);
                assert!(money_eq(net, price), "price {price} rate {rate} -> {net}");
            }
        }
    }

    #[test]
    fn test_computed_zero_is_exact_zero() {
        assert_eq!(calc().calculate_price(Decimal::ZERO, dec!(20), true), Decimal::ZERO);
    }

    #[test]
    fn test_rounding_mode_from_settings() {
        // 10.25 * 1.1 = 11.275
        let away = PriceCalculator::new(2, MidpointRounding::AwayFromZero);
        let even = PriceCalculator::new(2, MidpointRounding::ToEven);
        assert_eq!(away.calculate_price(dec!(10.25), dec!(10), true), dec!(11.28));
        assert_eq!(even.calculate_price(dec!(10.25), dec!(10), true), dec!(11.28));
        // 10.15 * 1.1 = 11.165
        assert_eq!(away.calculate_price(dec!(10.15), dec!(10), true), dec!(11.17));
        assert_eq!(even.calculate_price(dec!(10.15), dec!(10), true), dec!(11.16));
    }

    // ==================== truth table ====================

    #[test]
    fn test_add_tax_to_exclusive_price() {
        let result = calc().convert(dec!(100), dec!(20), false, true, true);
        assert_eq!(result, TaxedPrice { price: dec!(120), tax_rate: dec!(20) });
    }

    #[test]
    fn test_strip_tax_from_inclusive_price() {
        let result = calc().convert(dec!(120), dec!(20), true, false, true);
        assert_eq!(result, TaxedPrice { price: dec!(100), tax_rate: dec!(20) });
    }

    #[test]
    fn test_truth_table_rows() {
        let c = calc();
        assert_eq!(c.convert(dec!(120), dec!(20), true, true, true).price, dec!(120));
        assert_eq!(c.convert(dec!(120), dec!(20), true, true, false).price, dec!(100));
        assert_eq!(c.convert(dec!(120), dec!(20), true, false, false).price, dec!(100));
        assert_eq!(c.convert(dec!(100), dec!(20), false, true, false).price, dec!(100));
        assert_eq!(c.convert(dec!(100), dec!(20), false, false, true).price, dec!(100));
        assert_eq!(c.convert(dec!(100), dec!(20), false, false, false).price, dec!(100));
    }

    #[test]
    fn test_not_taxable_forces_zero_rate() {
        for (pit, inc) in [(true, true), (true, false), (false, true), (false, false)] {
            let result = calc().convert(dec!(50), dec!(19), pit, inc, false);
            assert_eq!(result.tax_rate, Decimal::ZERO);
        }
    }

    #[test]
    fn test_negative_price_passes_through() {
        let result = calc().convert(dec!(-10), dec!(20), false, true, true);
        assert_eq!(result.price, dec!(-12));
    }

    // ==================== line breakdown ====================

    #[test]
    fn test_line_breakdown_exclusive_prices() {
        let amounts = LineAmounts {
            unit_price_without_discount: dec!(50),
            unit_price: dec!(40),
            sub_total: dec!(80),
            discount_amount: dec!(20),
            quantity: 2,
        };
        let line = calc().line_breakdown(&amounts, dec!(10), false, true);

        assert_eq!(line.unit_price_without_disc_incl_tax, dec!(55));
        assert_eq!(line.unit_price_without_disc_excl_tax, dec!(50));
        assert_eq!(line.unit_price_incl_tax, dec!(44));
        assert_eq!(line.unit_price_excl_tax, dec!(40));
        assert_eq!(line.sub_total_incl_tax, dec!(88));
        assert_eq!(line.sub_total_excl_tax, dec!(80));
        assert_eq!(line.discount_amount_incl_tax, dec!(22));
        assert_eq!(line.discount_amount_excl_tax, dec!(20));
        assert_eq!(line.tax_rate, dec!(10));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_line_breakdown_not_taxable_inclusive_prices() {
        let amounts = LineAmounts {
            unit_price: dec!(110),
            sub_total: dec!(110),
            quantity: 1,
            ..Default::default()
        };
        let line = calc().line_breakdown(&amounts, dec!(10), true, false);

        // Embedded tax is removed from both representations
        assert_eq!(line.unit_price_incl_tax, dec!(100));
        assert_eq!(line.unit_price_excl_tax, dec!(100));
        assert_eq!(line.tax_rate, Decimal::ZERO);
    }
}
