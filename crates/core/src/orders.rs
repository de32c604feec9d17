//! Orders

use std::{fmt, str::FromStr};

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use thiserror::Error;

use crate::{cart::CartLine, payments::PaymentReference};

/// Errors raised by order status changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The order is already delivered or cancelled.
    #[error("order {id} is {status} and cannot be cancelled")]
    NotCancellable {
        /// Order id
        id: OrderId,

        /// Current status
        status: OrderStatus,
    },
}

/// Order identifier.
///
/// The backend sends ids as numbers or strings; both are held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for an order created on this client, the epoch milliseconds of `now`.
    pub fn from_timestamp(now: Timestamp) -> Self {
        Self(now.as_millisecond().to_string())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    Pending,

    /// Paid and confirmed
    Confirmed,

    /// Handed to the courier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Cancelled by the customer or an admin
    Cancelled,
}

/// Unknown order status name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(String);

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Lower-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true when the order may still be cancelled.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Shipped)
    }

    /// Days from order placement to expected delivery.
    fn delivery_days(self) -> Option<i64> {
        match self {
            Self::Pending => Some(7),
            Self::Confirmed => Some(5),
            Self::Shipped => Some(2),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    fn progress(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Shipped => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| UnknownOrderStatus(value.to_string()))
    }
}

/// When an order should arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryEstimate {
    /// Expected on this date
    On(Date),

    /// Already delivered
    Delivered,

    /// Will not be delivered
    Cancelled,
}

/// One step of the tracking timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingStep {
    /// Status the step represents
    pub status: OrderStatus,

    /// Label shown to the customer
    pub label: &'static str,

    /// Whether the order has reached this step
    pub completed: bool,
}

/// Order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Email of the customer who placed the order
    pub customer_email: String,

    /// Customer name
    pub customer_name: Option<String>,

    /// Customer phone
    pub customer_phone: Option<String>,

    /// Delivery street address
    pub delivery_address: Option<String>,

    /// Delivery city or area
    pub delivery_location: Option<String>,

    /// Ordered lines
    pub items: Vec<CartLine>,

    /// Amount charged in minor units
    pub total: i64,

    /// Current status
    pub status: OrderStatus,

    /// Reference of the payment that settled the order
    pub payment_reference: Option<PaymentReference>,

    /// When the order was placed
    pub created_at: Timestamp,
}

impl Order {
    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotCancellable`] when the order is delivered or already cancelled.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.is_cancellable() {
            return Err(OrderError::NotCancellable {
                id: self.id.clone(),
                status: self.status,
            });
        }

        self.status = OrderStatus::Cancelled;

        Ok(())
    }

    /// Returns true when the order was placed by `email`, ignoring case.
    pub fn belongs_to(&self, email: &str) -> bool {
        self.customer_email.eq_ignore_ascii_case(email.trim())
    }

    /// UTC calendar date the order was placed on.
    pub fn created_on(&self) -> Date {
        self.created_at.to_zoned(TimeZone::UTC).date()
    }

    /// Expected delivery for the current status.
    pub fn expected_delivery(&self) -> DeliveryEstimate {
        match self.status.delivery_days() {
            Some(days) => self
                .created_on()
                .checked_add(days.days())
                .map_or(DeliveryEstimate::On(Date::MAX), DeliveryEstimate::On),
            None if self.status == OrderStatus::Delivered => DeliveryEstimate::Delivered,
            None => DeliveryEstimate::Cancelled,
        }
    }

    /// Tracking timeline from placement to delivery.
    pub fn tracking_steps(&self) -> [TrackingStep; 4] {
        let reached = |step: OrderStatus| match (self.status.progress(), step.progress()) {
            (Some(current), Some(step)) => current >= step,
            _ => step == OrderStatus::Pending,
        };

        [
            (OrderStatus::Pending, "Order Placed"),
            (OrderStatus::Confirmed, "Order Confirmed"),
            (OrderStatus::Shipped, "Shipped"),
            (OrderStatus::Delivered, "Delivered"),
        ]
        .map(|(status, label)| TrackingStep {
            status,
            label,
            completed: reached(status),
        })
    }
}

/// Status and date filter over an order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only this status
    pub status: Option<OrderStatus>,

    /// Placed on or after this UTC date
    pub from: Option<Date>,

    /// Placed on or before this UTC date
    pub to: Option<Date>,
}

impl OrderFilter {
    /// Returns true when `order` passes every set criterion.
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|status| status != order.status) {
            return false;
        }

        let placed = order.created_on();

        self.from.is_none_or(|from| placed >= from) && self.to.is_none_or(|to| placed <= to)
    }

    /// Borrow the orders that match.
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}


#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::{test_support::order, *};

    fn placed_at(value: &str) -> Result<Timestamp, jiff::Error> {
        value.parse()
    }

    #[test]
    fn cancel_allowed_until_delivered() -> TestResult {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
        ] {
            let mut order = order("1", "ada@example.com", 100, Timestamp::UNIX_EPOCH);
            order.status = status;

            order.cancel()?;

            assert_eq!(order.status, OrderStatus::Cancelled);
        }

        Ok(())
    }

    #[test]
    fn cancel_rejected_for_terminal_orders() {
        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let mut order = order("1", "ada@example.com", 100, Timestamp::UNIX_EPOCH);
            order.status = status;

            assert_eq!(
                order.cancel(),
                Err(OrderError::NotCancellable {
                    id: OrderId::new("1"),
                    status,
                })
            );
            assert_eq!(order.status, status);
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Shipped".parse(), Ok(OrderStatus::Shipped));
        assert_eq!(" cancelled ".parse(), Ok(OrderStatus::Cancelled));
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn expected_delivery_depends_on_status() -> TestResult {
        let mut order = order("1", "ada@example.com", 100, placed_at("2025-03-10T23:30:00Z")?);

        assert_eq!(
            order.expected_delivery(),
            DeliveryEstimate::On(date(2025, 3, 17))
        );

        order.status = OrderStatus::Confirmed;
        assert_eq!(
            order.expected_delivery(),
            DeliveryEstimate::On(date(2025, 3, 15))
        );

        order.status = OrderStatus::Shipped;
        assert_eq!(
            order.expected_delivery(),
            DeliveryEstimate::On(date(2025, 3, 12))
        );

        order.status = OrderStatus::Delivered;
        assert_eq!(order.expected_delivery(), DeliveryEstimate::Delivered);

        order.status = OrderStatus::Cancelled;
        assert_eq!(order.expected_delivery(), DeliveryEstimate::Cancelled);

        Ok(())
    }

    #[test]
    fn tracking_steps_follow_status() {
        let mut order = order("1", "ada@example.com", 100, Timestamp::UNIX_EPOCH);
        order.status = OrderStatus::Shipped;

        let completed = order.tracking_steps().map(|step| step.completed);
        assert_eq!(completed, [true, true, true, false]);

        order.status = OrderStatus::Cancelled;
        let completed = order.tracking_steps().map(|step| step.completed);
        assert_eq!(completed, [true, false, false, false]);
    }

    #[test]
    fn belongs_to_ignores_case() {
        let order = order("1", "ada@example.com", 100, Timestamp::UNIX_EPOCH);

        assert!(order.belongs_to(" Ada@Example.com"));
        assert!(!order.belongs_to("grace@example.com"));
    }

    #[test]
    fn filter_by_status_and_inclusive_dates() -> TestResult {
        let mut shipped = order("2", "ada@example.com", 100, placed_at("2025-03-12T08:00:00Z")?);
        shipped.status = OrderStatus::Shipped;

        let orders = [
            order("1", "ada@example.com", 100, placed_at("2025-03-10T23:59:59Z")?),
            shipped,
            order("3", "ada@example.com", 100, placed_at("2025-03-15T00:00:00Z")?),
        ];

        let filter = OrderFilter {
            from: Some(date(2025, 3, 10)),
            to: Some(date(2025, 3, 12)),
            ..OrderFilter::default()
        };
        let ids: Vec<_> = filter.apply(&orders).iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);

        let filter = OrderFilter {
            status: Some(OrderStatus::Pending),
            ..OrderFilter::default()
        };
        let ids: Vec<_> = filter.apply(&orders).iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);

        Ok(())
    }

    #[test]
    fn order_id_from_timestamp_is_millis() -> TestResult {
        let id = OrderId::from_timestamp(Timestamp::from_millisecond(1_736_762_400_000)?);

        assert_eq!(id.as_str(), "1736762400000");

        Ok(())
    }
}
