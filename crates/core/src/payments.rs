//! Payments

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rand::Rng;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    cart::CartLine,
    ids::{is_timestamped_id, timestamped_id},
    orders::{Order, OrderId},
    pricing::{STORE_CURRENCY, money},
};

const REFERENCE_PREFIX: &str = "BMP";

/// Errors raised when reading a payment reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// The reference was empty or whitespace.
    #[error("payment reference is blank")]
    Blank,
}

/// Unique payment reference shared with the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Generate a fresh reference of the form `BMP_{millis}_{suffix}`.
    pub fn generate<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        Self(timestamped_id(REFERENCE_PREFIX, now, rng))
    }

    /// Read a reference from the backend, the provider or the local cache.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::Blank`] for empty input.
    pub fn parse(value: &str) -> Result<Self, ReferenceError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(ReferenceError::Blank);
        }

        Ok(Self(value.to_string()))
    }

    /// Returns true when the reference was produced by [`PaymentReference::generate`].
    pub fn is_generated(&self) -> bool {
        is_timestamped_id(REFERENCE_PREFIX, &self.0)
    }

    /// Borrow the raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PaymentReference {
    type Err = ReferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Payment status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Settled
    Completed,

    /// Awaiting settlement
    Pending,

    /// Declined or errored
    Failed,

    /// Being processed by the provider
    Processing,
}

/// Unknown payment status name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(String);

impl PaymentStatus {
    /// Lower-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" | "success" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            "processing" => Ok(Self::Processing),
            _ => Err(UnknownPaymentStatus(value.to_string())),
        }
    }
}

/// Record of one payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    /// Provider reference
    pub reference: PaymentReference,

    /// Order the payment settled
    pub order_id: Option<OrderId>,

    /// Email of the paying customer, when the backend reports it
    pub customer_email: Option<String>,

    /// Amount in minor units
    pub amount: i64,

    /// Current status
    pub status: PaymentStatus,

    /// When the payment was made
    pub date: Timestamp,

    /// Payment method, e.g. `Card`
    pub method: Option<String>,

    /// Items paid for
    pub items: Vec<CartLine>,
}

impl PaymentRecord {
    /// Completed card payment for an order placed on this client.
    pub fn for_order(order: &Order, reference: PaymentReference) -> Self {
        Self {
            reference,
            order_id: Some(order.id.clone()),
            customer_email: Some(order.customer_email.clone()),
            amount: order.total,
            status: PaymentStatus::Completed,
            date: order.created_at,
            method: Some("Card".to_string()),
            items: order.items.clone(),
        }
    }

    /// Plain text receipt. Only completed payments have one.
    pub fn receipt(&self) -> Option<String> {
        if self.status != PaymentStatus::Completed {
            return None;
        }

        let mut lines = vec![
            "BEST MARKET PLACE".to_string(),
            "Payment Receipt".to_string(),
            String::new(),
            format!("Reference: {}", self.reference),
            format!("Date: {}", self.date.strftime("%b %-d, %Y %H:%M")),
            format!("Status: {}", self.status),
            format!("Amount: {}", money(self.amount)),
            String::new(),
        ];

        if self.items.is_empty() {
            lines.push("No items information available".to_string());
        } else {
            lines.push("Items:".to_string());
            lines.extend(self.items.iter().map(|item| {
                format!(
                    "{} x{} - {}",
                    item.name,
                    item.quantity,
                    money(item.line_total())
                )
            }));
        }

        lines.push(String::new());
        lines.push("Thank you for shopping with us!".to_string());

        Some(lines.join("\n"))
    }
}

/// Data handed to the payment popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount to charge in minor units
    pub amount_minor: i64,

    /// ISO currency code
    pub currency_code: &'static str,

    /// Buyer email
    pub email: String,

    /// Client-generated reference
    pub reference: PaymentReference,
}

impl PaymentRequest {
    /// Request a charge of `amount_minor` in the store currency.
    pub fn new(amount_minor: i64, email: impl Into<String>, reference: PaymentReference) -> Self {
        Self {
            amount_minor,
            currency_code: STORE_CURRENCY.iso_alpha_code,
            email: email.into(),
            reference,
        }
    }
}

/// How the payment popup finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The provider reported success for this reference.
    Succeeded {
        /// Reference echoed back by the provider
        reference: PaymentReference,
    },

    /// The shopper closed the popup.
    Closed,
}

/// Copy order items onto payments that have none, matching by payment reference or order id.
pub fn backfill_items(payments: &mut [PaymentRecord], orders: &[Order]) {
    let mut by_reference = FxHashMap::default();
    let mut by_id = FxHashMap::default();

    for order in orders.iter().filter(|order| !order.items.is_empty()) {
        if let Some(reference) = &order.payment_reference {
            by_reference.entry(reference).or_insert(order);
        }

        by_id.entry(&order.id).or_insert(order);
    }

    for payment in payments.iter_mut().filter(|payment| payment.items.is_empty()) {
        let order = by_reference.get(&payment.reference).or_else(|| {
            payment
                .order_id
                .as_ref()
                .and_then(|order_id| by_id.get(order_id))
        });

        if let Some(order) = order {
            payment.items.clone_from(&order.items);
        }
    }
}

/// Borrow the payments with `status`, or all of them when `status` is `None`.
pub fn filter_by_status(
    payments: &[PaymentRecord],
    status: Option<PaymentStatus>,
) -> Vec<&PaymentRecord> {
    payments
        .iter()
        .filter(|payment| status.is_none_or(|status| payment.status == status))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn payment(reference: &str, order_id: Option<&str>, amount: i64) -> PaymentRecord {
        PaymentRecord {
            reference: PaymentReference(reference.to_string()),
            order_id: order_id.map(OrderId::new),
            customer_email: None,
            amount,
            status: PaymentStatus::Completed,
            date: Timestamp::UNIX_EPOCH,
            method: Some("Card".to_string()),
            items: Vec::new(),
        }
    }
}
