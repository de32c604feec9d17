//! Checkout service
//!
//! Checkout runs in two steps around the payment popup: [`CheckoutService::begin`] prices the
//! cart and produces the popup request, [`CheckoutService::complete`] records the outcome.

use jiff::Timestamp;
use storefront::{
    cart::{CartLine, CartTotals},
    customers::{MIN_PHONE_LEN, User, ValidationError},
    orders::{Order, OrderId, OrderStatus},
    payments::{PaymentOutcome, PaymentRecord, PaymentReference, PaymentRequest},
    promotions::PromoCode,
};
use thiserror::Error;
use tracing::info;

use crate::{
    services::cart::{CartService, CartServiceError},
    storage::{LocalStore, StorageError},
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("please sign in to continue with payment")]
    NotSignedIn,

    #[error("your cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("payment reference {received} does not match {expected}")]
    ReferenceMismatch {
        expected: PaymentReference,
        received: PaymentReference,
    },

    #[error(transparent)]
    Cart(#[from] CartServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where the order goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    /// Contact phone number
    pub phone: String,

    /// Street address
    pub address: String,

    /// City or delivery zone
    pub location: Option<String>,
}

/// A priced cart waiting on the payment popup.
#[derive(Debug, Clone)]
pub struct PendingCheckout {
    /// Buyer
    pub user: User,

    /// Lines being paid for
    pub lines: Vec<CartLine>,

    /// Applied promo
    pub promo: Option<PromoCode>,

    /// Price breakdown
    pub totals: CartTotals,

    /// Delivery details
    pub delivery: DeliveryDetails,

    /// Data for the payment popup
    pub request: PaymentRequest,
}

/// How a checkout ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutResult {
    /// Payment succeeded and the order was recorded.
    Placed {
        order: Order,
        payment: PaymentRecord,
    },

    /// The shopper closed the popup. Nothing was recorded.
    Cancelled,
}

#[derive(Clone)]
pub struct CheckoutService {
    store: LocalStore,
    cart: CartService,
}

impl CheckoutService {
    #[must_use]
    pub fn new(store: LocalStore, cart: CartService) -> Self {
        Self { store, cart }
    }

    /// Price the cart and build the payment popup request.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotSignedIn`] without a signed-in user.
    /// - [`CheckoutError::EmptyCart`] when the cart has no lines.
    /// - [`ValidationError::MissingFields`] without a phone number or address.
    /// - [`ValidationError::InvalidPhone`] for a phone number under [`MIN_PHONE_LEN`] characters.
    pub async fn begin(
        &self,
        delivery: DeliveryDetails,
        promo: Option<PromoCode>,
        now: Timestamp,
    ) -> Result<PendingCheckout, CheckoutError> {
        let user = self.store.user()?.ok_or(CheckoutError::NotSignedIn)?;
        let cart = self.cart.load(now).await?.into_inner();

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if delivery.phone.trim().is_empty() || delivery.address.trim().is_empty() {
            return Err(ValidationError::MissingFields.into());
        }

        if delivery.phone.trim().chars().count() < MIN_PHONE_LEN {
            return Err(ValidationError::InvalidPhone.into());
        }

        let totals = cart.totals(promo.as_ref());
        let reference = PaymentReference::generate(now, &mut rand::thread_rng());
        let request = PaymentRequest::new(
            totals.total.to_minor_units(),
            user.email.clone(),
            reference,
        );

        info!(reference = %request.reference, amount = request.amount_minor, "payment requested");

        Ok(PendingCheckout {
            user,
            lines: cart.into_lines(),
            promo,
            totals,
            delivery,
            request,
        })
    }

    /// Record the popup outcome.
    ///
    /// On success a confirmed order and a completed card payment are put at the front of the
    /// local order and payment history, and the cart is cleared.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::ReferenceMismatch`] when the provider reports another reference.
    /// - A storage error when the records cannot be written.
    pub async fn complete(
        &self,
        pending: PendingCheckout,
        outcome: PaymentOutcome,
        now: Timestamp,
    ) -> Result<CheckoutResult, CheckoutError> {
        let reference = match outcome {
            PaymentOutcome::Closed => {
                info!(reference = %pending.request.reference, "payment cancelled");

                return Ok(CheckoutResult::Cancelled);
            }
            PaymentOutcome::Succeeded { reference } => reference,
        };

        if reference != pending.request.reference {
            return Err(CheckoutError::ReferenceMismatch {
                expected: pending.request.reference,
                received: reference,
            });
        }

        let order = Order {
            id: OrderId::from_timestamp(now),
            customer_email: pending.user.email,
            customer_name: Some(pending.user.name),
            customer_phone: Some(pending.delivery.phone.trim().to_string()),
            delivery_address: Some(pending.delivery.address.trim().to_string()),
            delivery_location: pending.delivery.location,
            items: pending.lines,
            total: pending.request.amount_minor,
            status: OrderStatus::Confirmed,
            payment_reference: Some(reference.clone()),
            created_at: now,
        };

        let payment = PaymentRecord::for_order(&order, reference);

        let mut orders = self.store.orders()?;
        orders.insert(0, order.clone());
        self.store.save_orders(&orders)?;

        let mut payments = self.store.payments()?;
        payments.insert(0, payment.clone());
        self.store.save_payments(&payments)?;

        self.cart.clear(now).await?;

        info!(order = %order.id, reference = %payment.reference, "order placed");

        Ok(CheckoutResult::Placed { order, payment })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        api::{ApiError, MockStorefrontApi},
        test::fixtures::line,
    };

    use super::*;

    fn delivery() -> DeliveryDetails {
        DeliveryDetails {
            phone: "08012345678".to_string(),
            address: "12 Marina Road".to_string(),
            location: Some("Lagos".to_string()),
        }
    }

    fn signed_in_store() -> Result<LocalStore, StorageError> {
        let store = LocalStore::in_memory();
        store.save_user(&User {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })?;

        Ok(store)
    }

    fn checkout(store: &LocalStore, cart_lines: Vec<CartLine>) -> CheckoutService {
        let mut api = MockStorefrontApi::new();
        api.expect_get_cart()
            .returning(move |_| Ok(cart_lines.clone()));
        api.expect_clear_cart()
            .returning(|_| Err(ApiError::Timeout));

        let cart = CartService::new(Arc::new(api), store.clone());

        CheckoutService::new(store.clone(), cart)
    }

    #[tokio::test]
    async fn begin_requires_user_and_items() -> TestResult {
        let anonymous = LocalStore::in_memory();
        let result = checkout(&anonymous, vec![line("1", 1_800_000, 2)])
            .begin(delivery(), None, Timestamp::UNIX_EPOCH)
            .await;

        assert!(matches!(result, Err(CheckoutError::NotSignedIn)));

        let store = signed_in_store()?;
        let result = checkout(&store, Vec::new())
            .begin(delivery(), None, Timestamp::UNIX_EPOCH)
            .await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[tokio::test]
    async fn short_phone_is_rejected() -> TestResult {
        let store = signed_in_store()?;
        let mut short = delivery();
        short.phone = "080123456".to_string();

        let result = checkout(&store, vec![line("1", 1_800_000, 2)])
            .begin(short, None, Timestamp::UNIX_EPOCH)
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::Validation(ValidationError::InvalidPhone))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn begin_charges_cart_total() -> TestResult {
        let store = signed_in_store()?;

        let pending = checkout(&store, vec![line("1", 1_800_000, 2)])
            .begin(delivery(), None, Timestamp::UNIX_EPOCH)
            .await?;

        assert_eq!(pending.request.amount_minor, 4_120_000);
        assert_eq!(pending.request.currency_code, "NGN");
        assert_eq!(pending.request.email, "ada@example.com");
        assert!(pending.request.reference.is_generated());

        Ok(())
    }

    #[tokio::test]
    async fn successful_payment_records_order_and_clears_cart() -> TestResult {
        let store = signed_in_store()?;
        let service = checkout(&store, vec![line("1", 1_800_000, 2)]);
        let placed_at = Timestamp::from_millisecond(1_736_762_400_000)?;

        let pending = service.begin(delivery(), None, placed_at).await?;
        let reference = pending.request.reference.clone();

        let result = service
            .complete(pending, PaymentOutcome::Succeeded { reference }, placed_at)
            .await?;

        let CheckoutResult::Placed { order, payment } = result else {
            return Err("checkout was cancelled".into());
        };

        assert_eq!(order.id.as_str(), "1736762400000");
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.total, 4_120_000);
        assert_eq!(payment.order_id, Some(order.id.clone()));
        assert_eq!(payment.method.as_deref(), Some("Card"));

        assert_eq!(store.orders()?, [order]);
        assert_eq!(store.payments()?, [payment]);
        assert!(store.cart()?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn closed_popup_records_nothing() -> TestResult {
        let store = signed_in_store()?;
        let service = checkout(&store, vec![line("1", 1_800_000, 2)]);

        let pending = service
            .begin(delivery(), None, Timestamp::UNIX_EPOCH)
            .await?;
        let result = service
            .complete(pending, PaymentOutcome::Closed, Timestamp::UNIX_EPOCH)
            .await?;

        assert_eq!(result, CheckoutResult::Cancelled);
        assert!(store.orders()?.is_empty());
        assert_eq!(store.cart()?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_reference_is_rejected() -> TestResult {
        let store = signed_in_store()?;
        let service = checkout(&store, vec![line("1", 1_800_000, 2)]);

        let pending = service
            .begin(delivery(), None, Timestamp::UNIX_EPOCH)
            .await?;
        let outcome = PaymentOutcome::Succeeded {
            reference: PaymentReference::parse("BMP_0_other")?,
        };

        assert!(matches!(
            service
                .complete(pending, outcome, Timestamp::UNIX_EPOCH)
                .await,
            Err(CheckoutError::ReferenceMismatch { .. })
        ));
        assert!(store.payments()?.is_empty());

        Ok(())
    }
}
