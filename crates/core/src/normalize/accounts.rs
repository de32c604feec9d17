//! Customer, user and promo wire shapes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    customers::{Customer, User, normalize_email},
    normalize::{
        NormalizeError,
        fields::{clean_text, parse_date, to_minor},
    },
    promotions::{PromoCode, PromoValidation},
};

/// Registered customer as listed by the admin endpoint or the local `registeredUsers` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCustomer {
    /// Full name
    #[serde(default)]
    pub name: String,

    /// Email
    pub email: String,

    /// Registration date
    #[serde(
        rename = "registrationDate",
        alias = "registration_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_date: Option<String>,

    /// Account creation time, sent by older records instead of the registration date
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

impl TryFrom<WireCustomer> for Customer {
    type Error = NormalizeError;

    fn try_from(wire: WireCustomer) -> Result<Self, Self::Error> {
        let email = clean_text(Some(wire.email))
            .map(|email| normalize_email(&email))
            .ok_or(NormalizeError::Missing("email"))?;

        let registration_date = clean_text(wire.registration_date)
            .or_else(|| clean_text(wire.created_at))
            .map(|date| parse_date(&date))
            .transpose()?;

        Ok(Self {
            name: wire.name.trim().to_string(),
            email,
            registration_date,
        })
    }
}

impl From<&Customer> for WireCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            registration_date: customer.registration_date.map(|date| date.to_string()),
            created_at: None,
        }
    }
}

/// Signed-in user as returned by login and registration, and kept in the local `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireUser {
    /// Full name
    #[serde(default)]
    pub name: String,

    /// Email
    pub email: String,
}

impl TryFrom<WireUser> for User {
    type Error = NormalizeError;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        let email = clean_text(Some(wire.email))
            .map(|email| normalize_email(&email))
            .ok_or(NormalizeError::Missing("email"))?;

        Ok(Self {
            name: wire.name.trim().to_string(),
            email,
        })
    }
}

impl From<&User> for WireUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Response of the promo validation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePromoValidation {
    /// Whether the code was accepted
    #[serde(default)]
    pub valid: bool,

    /// Percentage points or major units, depending on `kind`
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,

    /// `percentage` or `fixed`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Description of the offer
    #[serde(default)]
    pub description: Option<String>,

    /// Message for the shopper
    #[serde(default)]
    pub message: Option<String>,
}

const INVALID_PROMO_MESSAGE: &str = "Invalid promo code";

impl WirePromoValidation {
    /// Build the validation result for `code`.
    ///
    /// # Errors
    ///
    /// - [`NormalizeError::Missing`] when a valid response has no discount or type.
    /// - [`NormalizeError::PromoKind`] for an unknown discount type.
    /// - [`NormalizeError::Amount`] when a fixed discount does not fit in minor units.
    pub fn into_validation(self, code: &str) -> Result<PromoValidation, NormalizeError> {
        let message = clean_text(self.message);

        if !self.valid {
            return Ok(PromoValidation::Invalid {
                message: message.unwrap_or_else(|| INVALID_PROMO_MESSAGE.to_string()),
            });
        }

        let discount = self.discount.ok_or(NormalizeError::Missing("discount"))?;
        let kind = clean_text(self.kind).ok_or(NormalizeError::Missing("type"))?;

        let promo = match kind.to_ascii_lowercase().as_str() {
            "percentage" => PromoCode::percentage(code, discount),
            "fixed" => PromoCode::fixed(code, to_minor(discount)?),
            _ => return Err(NormalizeError::PromoKind(kind)),
        };

        let promo = match clean_text(self.description) {
            Some(description) => promo.with_description(description),
            None => promo,
        };

        Ok(PromoValidation::Valid { promo, message })
    }
}
