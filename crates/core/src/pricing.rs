//! Prices
//!
//! All amounts are held as integer minor units (kobo) of [`STORE_CURRENCY`]. The backend and
//! the local cache speak major units, so conversion happens here and nowhere else.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every storefront price is quoted in.
pub const STORE_CURRENCY: &Currency = iso::NGN;

/// Decimal places between major and minor units of [`STORE_CURRENCY`].
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors raised while converting or scaling amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The scaled amount does not fit in minor units.
    #[error("amount overflowed or was not representable in minor units")]
    Overflow,
}

/// Wrap a minor unit amount in the store currency.
pub fn money(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, STORE_CURRENCY)
}

/// Convert a major unit amount (e.g. `18000.50` naira) to minor units, rounding half away from
/// zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount does not fit in an `i64` of minor units.
pub fn major_to_minor(amount: Decimal) -> Result<i64, PricingError> {
    let scale = Decimal::from_i64(10_i64.pow(MINOR_UNIT_SCALE)).ok_or(PricingError::Overflow)?;

    amount
        .checked_mul(scale)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

/// Convert minor units back to a major unit decimal.
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Calculate a percentage of a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result cannot be represented in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

/// Price of `quantity` units at `unit_price`, saturating at the `i64` bounds.
pub fn line_total(unit_price: i64, quantity: u32) -> i64 {
    unit_price.saturating_mul(i64::from(quantity))
}
