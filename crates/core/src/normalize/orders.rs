//! Order and payment wire shapes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    cart::CartLine,
    customers::normalize_email,
    normalize::{
        NormalizeError, WireCartLine,
        fields::{WireId, clean_text, parse_timestamp, to_major, to_minor},
        to_wire,
    },
    orders::{Order, OrderId, OrderStatus},
    payments::{PaymentRecord, PaymentReference, PaymentStatus},
};

/// Contact block some orders carry instead of the flat customer fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCustomerInfo {
    /// Customer name
    #[serde(default)]
    pub name: Option<String>,

    /// Customer email
    #[serde(default)]
    pub email: Option<String>,

    /// Customer phone
    #[serde(default)]
    pub phone: Option<String>,
}

/// Order as returned by the backend or kept in the local `userOrders` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOrder {
    /// Order id
    pub id: WireId,

    /// Customer name
    #[serde(default)]
    pub customer_name: Option<String>,

    /// Customer email
    #[serde(default)]
    pub customer_email: Option<String>,

    /// Customer phone
    #[serde(default)]
    pub customer_phone: Option<String>,

    /// Street address, or an object with an `address` field
    #[serde(default)]
    pub delivery_address: Option<Value>,

    /// City or area
    #[serde(default, alias = "city", skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<String>,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<WireCartLine>,

    /// Amount charged in major units
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,

    /// Amount charged, used by records without `total`
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,

    /// Status name
    #[serde(default)]
    pub status: Option<String>,

    /// Placement time
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,

    /// Reference of the settling payment
    #[serde(default, alias = "paymentReference")]
    pub payment_reference: Option<String>,

    /// Contact block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<WireCustomerInfo>,
}

fn address_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(address) => clean_text(Some(address)),
        Value::Object(fields) => match fields.get("address") {
            Some(Value::String(address)) => clean_text(Some(address.clone())),
            _ => None,
        },
        _ => None,
    }
}

fn order_status(value: Option<String>) -> Result<OrderStatus, NormalizeError> {
    let Some(value) = clean_text(value) else {
        return Ok(OrderStatus::Pending);
    };

    value
        .parse()
        .ok()
        .ok_or(NormalizeError::Status(value))
}

fn cart_lines(items: Vec<WireCartLine>) -> Result<Vec<CartLine>, NormalizeError> {
    items.into_iter().map(CartLine::try_from).collect()
}

fn payment_reference(value: Option<String>) -> Result<Option<PaymentReference>, NormalizeError> {
    clean_text(value)
        .map(|reference| PaymentReference::parse(&reference))
        .transpose()
        .map_err(NormalizeError::from)
}

impl TryFrom<WireOrder> for Order {
    type Error = NormalizeError;

    fn try_from(wire: WireOrder) -> Result<Self, Self::Error> {
        let info = wire.customer_info.unwrap_or_default();

        let customer_email = clean_text(wire.customer_email)
            .or_else(|| clean_text(info.email))
            .map(|email| normalize_email(&email))
            .ok_or(NormalizeError::Missing("customer_email"))?;

        let total = wire
            .total
            .or(wire.amount)
            .ok_or(NormalizeError::Missing("total"))?;

        let created_at = wire
            .created_at
            .as_deref()
            .ok_or(NormalizeError::Missing("created_at"))
            .and_then(parse_timestamp)?;

        Ok(Self {
            id: OrderId::new(wire.id.to_string()),
            customer_email,
            customer_name: clean_text(wire.customer_name).or_else(|| clean_text(info.name)),
            customer_phone: clean_text(wire.customer_phone).or_else(|| clean_text(info.phone)),
            delivery_address: address_text(wire.delivery_address),
            delivery_location: clean_text(wire.delivery_location),
            items: cart_lines(wire.items)?,
            total: to_minor(total)?,
            status: order_status(wire.status)?,
            payment_reference: payment_reference(wire.payment_reference)?,
            created_at,
        })
    }
}

impl From<&Order> for WireOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: WireId::from_text(order.id.as_str()),
            customer_name: order.customer_name.clone(),
            customer_email: Some(order.customer_email.clone()),
            customer_phone: order.customer_phone.clone(),
            delivery_address: order.delivery_address.clone().map(Value::String),
            delivery_location: order.delivery_location.clone(),
            items: to_wire(&order.items),
            total: Some(to_major(order.total)),
            amount: None,
            status: Some(order.status.as_str().to_string()),
            created_at: Some(order.created_at.to_string()),
            payment_reference: order
                .payment_reference
                .as_ref()
                .map(ToString::to_string),
            customer_info: None,
        }
    }
}

fn default_payment_status() -> String {
    PaymentStatus::Pending.as_str().to_string()
}

/// Payment as returned by the payment history endpoints or kept in the local `paymentHistory`
/// key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePayment {
    /// Provider reference
    pub reference: String,

    /// Settled order
    #[serde(rename = "orderId", alias = "order_id", default)]
    pub order_id: Option<WireId>,

    /// Paying customer, reported by the admin history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Amount in major units
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,

    /// Amount under the order field name
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<Decimal>,

    /// Payment status, or the status of the settled order
    #[serde(default = "default_payment_status")]
    pub status: String,

    /// Payment time
    #[serde(default)]
    pub date: Option<String>,

    /// Payment time under the order field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Payment method
    #[serde(rename = "paymentMethod", alias = "payment_method", default)]
    pub payment_method: Option<String>,

    /// Items paid for
    #[serde(default)]
    pub items: Vec<WireCartLine>,
}

/// Payment status from either a payment status name or the name of the settled order's status.
fn payment_status(value: &str) -> Result<PaymentStatus, NormalizeError> {
    if let Ok(status) = value.parse::<OrderStatus>() {
        return Ok(match status {
            OrderStatus::Pending => PaymentStatus::Pending,
            OrderStatus::Confirmed | OrderStatus::Shipped | OrderStatus::Delivered => {
                PaymentStatus::Completed
            }
            OrderStatus::Cancelled => PaymentStatus::Failed,
        });
    }

    value
        .parse()
        .ok()
        .ok_or_else(|| NormalizeError::Status(value.to_string()))
}

impl TryFrom<WirePayment> for PaymentRecord {
    type Error = NormalizeError;

    fn try_from(wire: WirePayment) -> Result<Self, Self::Error> {
        let amount = wire
            .amount
            .or(wire.total)
            .ok_or(NormalizeError::Missing("amount"))?;

        let date = wire
            .date
            .or(wire.created_at)
            .ok_or(NormalizeError::Missing("date"))?;

        Ok(Self {
            reference: PaymentReference::parse(&wire.reference)?,
            order_id: wire.order_id.map(|id| OrderId::new(id.to_string())),
            customer_email: clean_text(wire.customer_email).map(|email| normalize_email(&email)),
            amount: to_minor(amount)?,
            status: payment_status(&wire.status)?,
            date: parse_timestamp(&date)?,
            method: clean_text(wire.payment_method),
            items: cart_lines(wire.items)?,
        })
    }
}

impl From<&PaymentRecord> for WirePayment {
    fn from(payment: &PaymentRecord) -> Self {
        Self {
            reference: payment.reference.to_string(),
            order_id: payment
                .order_id
                .as_ref()
                .map(|id| WireId::from_text(id.as_str())),
            customer_email: payment.customer_email.clone(),
            amount: Some(to_major(payment.amount)),
            total: None,
            status: payment.status.as_str().to_string(),
            date: Some(payment.date.to_string()),
            created_at: None,
            payment_method: payment.method.clone(),
            items: to_wire(&payment.items),
        }
    }
}
