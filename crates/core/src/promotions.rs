//! Promotions
//!
//! Promo codes are validated by the backend. Once validated they are immutable and only feed the
//! discount step of the cart totals.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::pricing::{minor_to_major, percent_of_minor};

/// The two kinds of promo code the backend issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoKind {
    /// Percentage of the subtotal
    Percentage,

    /// Fixed amount off the subtotal
    Fixed,
}

/// Discount carried by a promo code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromoDiscount {
    /// Take a percentage off the subtotal (e.g. "10% off")
    PercentageOff(Percentage),

    /// Take a fixed amount in minor units off the subtotal (e.g. "₦500 off")
    AmountOff(i64),
}

/// A validated promo code.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode {
    code: String,
    discount: PromoDiscount,
    description: Option<String>,
}

impl PromoCode {
    /// Create a promo code from its discount.
    pub fn new(code: impl Into<String>, discount: PromoDiscount) -> Self {
        Self {
            code: code.into(),
            discount,
            description: None,
        }
    }

    /// Percentage promo, where `points` is the whole-number percentage (`10` for 10%).
    pub fn percentage(code: impl Into<String>, points: Decimal) -> Self {
        Self::new(
            code,
            PromoDiscount::PercentageOff(Percentage::from(points / Decimal::ONE_HUNDRED)),
        )
    }

    /// Fixed amount promo in minor units.
    pub fn fixed(code: impl Into<String>, amount: i64) -> Self {
        Self::new(code, PromoDiscount::AmountOff(amount))
    }

    /// Attach a human readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The code as entered by the shopper.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The discount rule.
    pub fn discount(&self) -> PromoDiscount {
        self.discount
    }

    /// Optional description returned by the backend.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Kind of discount.
    pub fn kind(&self) -> PromoKind {
        match self.discount {
            PromoDiscount::PercentageOff(_) => PromoKind::Percentage,
            PromoDiscount::AmountOff(_) => PromoKind::Fixed,
        }
    }

    /// Discount value in the backend's terms: percentage points, or major units for fixed codes.
    pub fn value(&self) -> Decimal {
        match self.discount {
            PromoDiscount::PercentageOff(percent) => (percent * Decimal::ONE_HUNDRED).normalize(),
            PromoDiscount::AmountOff(amount) => minor_to_major(amount),
        }
    }

    /// Discount in minor units for a given subtotal, clamped to `0..=subtotal`.
    pub fn discount_on(&self, subtotal: i64) -> i64 {
        let ceiling = subtotal.max(0);

        let raw = match self.discount {
            PromoDiscount::PercentageOff(percent) => {
                percent_of_minor(&percent, ceiling).unwrap_or(ceiling)
            }
            PromoDiscount::AmountOff(amount) => amount,
        };

        raw.max(0).min(ceiling)
    }
}

/// Result of asking the backend whether a code is valid.
#[derive(Debug, Clone, PartialEq)]
pub enum PromoValidation {
    /// The code can be applied.
    Valid {
        /// Validated code
        promo: PromoCode,

        /// Message to show the shopper
        message: Option<String>,
    },

    /// The code was rejected.
    Invalid {
        /// Reason to show the shopper
        message: String,
    },
}

impl PromoValidation {
    /// The promo, when valid.
    pub fn promo(&self) -> Option<&PromoCode> {
        match self {
            Self::Valid { promo, .. } => Some(promo),
            Self::Invalid { .. } => None,
        }
    }
}
