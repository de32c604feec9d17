//! Cart totals

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::CartLine,
    pricing::{STORE_CURRENCY, percent_of_minor},
    promotions::PromoCode,
};

/// Tax, shipping and currency rules applied when totalling a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalsPolicy {
    /// Tax charged on the discounted subtotal
    pub tax_rate: Percentage,

    /// Shipping is free when the discounted subtotal is strictly above this, in minor units
    pub free_shipping_above: i64,

    /// Flat shipping fee in minor units
    pub shipping_fee: i64,

    /// Currency of every amount
    pub currency: &'static Currency,
}

impl Default for TotalsPolicy {
    /// 7.5% VAT, free shipping above ₦50,000 and a ₦2,500 fee otherwise.
    fn default() -> Self {
        Self {
            tax_rate: Percentage::from(Decimal::new(75, 3)),
            free_shipping_above: 5_000_000,
            shipping_fee: 250_000,
            currency: STORE_CURRENCY,
        }
    }
}

/// Breakdown of a cart's cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    /// Sum of line totals
    pub subtotal: Money<'static, Currency>,

    /// Promo discount, never more than the subtotal
    pub discount: Money<'static, Currency>,

    /// Subtotal less discount
    pub taxable_base: Money<'static, Currency>,

    /// Tax on the taxable base
    pub tax: Money<'static, Currency>,

    /// Shipping fee
    pub shipping: Money<'static, Currency>,

    /// Amount to charge
    pub total: Money<'static, Currency>,
}

impl TotalsPolicy {
    /// Total `lines` with an optional promo code.
    ///
    /// Fractional kobo round half away from zero and arithmetic saturates, so there are no error
    /// cases.
    pub fn compute(&self, lines: &[CartLine], promo: Option<&PromoCode>) -> CartTotals {
        let subtotal = lines
            .iter()
            .fold(0_i64, |sum, line| sum.saturating_add(line.line_total()));

        let discount = promo.map_or(0, |promo| promo.discount_on(subtotal));
        let taxable_base = subtotal.saturating_sub(discount);
        let tax = saturating_percent(&self.tax_rate, taxable_base);

        let shipping = if taxable_base > self.free_shipping_above {
            0
        } else {
            self.shipping_fee
        };

        let total = taxable_base.saturating_add(tax).saturating_add(shipping);

        let money = |minor| Money::from_minor(minor, self.currency);

        CartTotals {
            subtotal: money(subtotal),
            discount: money(discount),
            taxable_base: money(taxable_base),
            tax: money(tax),
            shipping: money(shipping),
            total: money(total),
        }
    }
}

/// Total `lines` under the default store policy.
pub fn compute_totals(lines: &[CartLine], promo: Option<&PromoCode>) -> CartTotals {
    TotalsPolicy::default().compute(lines, promo)
}

fn saturating_percent(percent: &Percentage, minor: i64) -> i64 {
    percent_of_minor(percent, minor).unwrap_or(if minor < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use crate::products::test_support::product;

    use super::*;

    fn line(id: &str, unit_price: i64, quantity: u32) -> CartLine {
        CartLine::from_product(
            &product(id, "Item", "Brand", "misc", unit_price),
            quantity,
            None,
            None,
        )
    }

    fn minor(totals: &CartTotals) -> [i64; 6] {
        [
            totals.subtotal.to_minor_units(),
            totals.discount.to_minor_units(),
            totals.taxable_base.to_minor_units(),
            totals.tax.to_minor_units(),
            totals.shipping.to_minor_units(),
            totals.total.to_minor_units(),
        ]
    }

    #[test]
    fn totals_without_promo() {
        let totals = compute_totals(&[line("1", 1_800_000, 2)], None);

        assert_eq!(
            minor(&totals),
            [3_600_000, 0, 3_600_000, 270_000, 250_000, 4_120_000]
        );
    }

    #[test]
    fn totals_with_percentage_promo() {
        let promo = PromoCode::percentage("234567", Decimal::from(10));

        let totals = compute_totals(&[line("1", 1_800_000, 2)], Some(&promo));

        assert_eq!(
            minor(&totals),
            [3_600_000, 360_000, 3_240_000, 243_000, 250_000, 3_733_000]
        );
    }

    #[test]
    fn fixed_promo_larger_than_subtotal_discounts_everything() {
        let promo = PromoCode::fixed("HUGE", 9_999_999);

        let totals = compute_totals(&[line("1", 100_000, 1)], Some(&promo));

        assert_eq!(totals.discount, totals.subtotal);
        assert_eq!(totals.taxable_base.to_minor_units(), 0);
        assert_eq!(totals.tax.to_minor_units(), 0);
        assert_eq!(totals.total.to_minor_units(), 250_000);
    }

    #[test]
    fn shipping_charged_at_exactly_threshold() {
        let totals = compute_totals(&[line("1", 5_000_000, 1)], None);

        assert_eq!(totals.shipping.to_minor_units(), 250_000);
    }

    #[test]
    fn shipping_free_just_above_threshold() {
        let totals = compute_totals(&[line("1", 5_000_001, 1)], None);

        assert_eq!(totals.shipping.to_minor_units(), 0);
    }

    #[test]
    fn discount_can_bring_order_back_under_free_shipping() {
        let promo = PromoCode::percentage("234567", Decimal::from(10));

        let totals = compute_totals(&[line("1", 3_000_000, 2)], Some(&promo));

        assert_eq!(totals.taxable_base.to_minor_units(), 5_400_000);
        assert_eq!(totals.shipping.to_minor_units(), 0);

        let totals = compute_totals(&[line("1", 2_500_000, 2)], Some(&promo));

        assert_eq!(totals.taxable_base.to_minor_units(), 4_500_000);
        assert_eq!(totals.shipping.to_minor_units(), 250_000);
    }

    #[test]
    fn empty_cart_still_charges_shipping() {
        let totals = compute_totals(&[], None);

        assert_eq!(minor(&totals), [0, 0, 0, 0, 250_000, 250_000]);
    }

    #[test]
    fn huge_quantities_saturate() {
        let totals = compute_totals(&[line("1", i64::MAX, 2), line("2", 1, 1)], None);

        assert_eq!(totals.subtotal.to_minor_units(), i64::MAX);
        assert_eq!(totals.total.to_minor_units(), i64::MAX);
    }

    #[test]
    fn custom_policy_is_respected() {
        let policy = TotalsPolicy {
            tax_rate: Percentage::from(0.0),
            free_shipping_above: 0,
            shipping_fee: 99,
            ..TotalsPolicy::default()
        };

        let totals = policy.compute(&[line("1", 1_000, 1)], None);

        assert_eq!(minor(&totals), [1_000, 0, 1_000, 0, 0, 1_000]);
    }
}
