//! Orders service

use std::sync::Arc;

use smallvec::{SmallVec, smallvec};
use storefront::{
    orders::{Order, OrderError, OrderId, OrderStatus},
    reconcile::{RecordSource, Sourced, fallback_records, merge_records_by_any},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiError, StorefrontApi},
    storage::{LocalStore, StorageError},
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("could not update order {id}: {source}")]
    Unreachable {
        id: OrderId,

        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Keys an order is recognised by across sources: its id and, when paid, its payment reference.
pub(crate) fn order_keys(order: &Order) -> SmallVec<[String; 2]> {
    let mut keys: SmallVec<[String; 2]> = smallvec![format!("id:{}", order.id)];

    if let Some(reference) = &order.payment_reference {
        keys.push(format!("ref:{reference}"));
    }

    keys
}

/// Order history and status changes.
#[derive(Clone)]
pub struct OrdersService {
    api: Arc<dyn StorefrontApi>,
    store: LocalStore,
}

impl OrdersService {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, store: LocalStore) -> Self {
        Self { api, store }
    }

    /// Orders placed by `email`: the backend's, followed by local ones it does not know about.
    ///
    /// # Errors
    ///
    /// Returns an error when the local orders cannot be read.
    pub async fn for_user(&self, email: &str) -> Result<Vec<Sourced<Order>>, StorageError> {
        let local: Vec<Order> = self
            .store
            .orders()?
            .into_iter()
            .filter(|order| order.belongs_to(email))
            .collect();

        match self.api.user_orders(email).await {
            Ok(remote) => Ok(merge_records_by_any(&remote, &local, order_keys)),
            Err(error) => {
                warn!(%error, email, "loading orders from backend failed, using local orders");

                Ok(fallback_records(&local))
            }
        }
    }

    /// Every order, for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error when the local orders cannot be read.
    pub async fn admin_list(&self) -> Result<Vec<Sourced<Order>>, StorageError> {
        let local = self.store.orders()?;

        match self.api.admin_orders().await {
            Ok(remote) => Ok(merge_records_by_any(&remote, &local, order_keys)),
            Err(error) => {
                warn!(%error, "loading admin orders failed, using local orders");

                Ok(fallback_records(&local))
            }
        }
    }

    /// Cancel an order.
    ///
    /// Returns where the cancellation took effect: [`RecordSource::Remote`] when the backend
    /// accepted it, [`RecordSource::Local`] when only the local copy was changed. Orders with no
    /// local copy are left to the backend to judge.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotCancellable`] when the local copy is delivered or cancelled.
    /// - [`OrdersServiceError::Unreachable`] when the backend refused and there is no local copy.
    pub async fn cancel(&self, id: &OrderId) -> Result<RecordSource, OrdersServiceError> {
        let orders = self.store.orders()?;

        let blocked = orders
            .iter()
            .find(|order| &order.id == id)
            .filter(|order| !order.status.is_cancellable());

        if let Some(order) = blocked {
            return Err(OrderError::NotCancellable {
                id: id.clone(),
                status: order.status,
            }
            .into());
        }

        let remote = self.api.cancel_order(id).await;

        self.record(id, OrderStatus::Cancelled, remote, orders)
    }

    /// Set an order's status, as the admin does.
    ///
    /// Any status may be set from any other, including moving backwards.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::Unreachable`] when the backend refused and there is no
    /// local copy.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<RecordSource, OrdersServiceError> {
        let orders = self.store.orders()?;
        let remote = self.api.update_order_status(id, status).await;

        self.record(id, status, remote, orders)
    }

    fn record(
        &self,
        id: &OrderId,
        status: OrderStatus,
        remote: Result<(), ApiError>,
        mut orders: Vec<Order>,
    ) -> Result<RecordSource, OrdersServiceError> {
        let local = orders.iter_mut().find(|order| &order.id == id);

        let source = match (remote, local) {
            (Ok(()), Some(order)) => {
                order.status = status;
                RecordSource::Remote
            }
            (Ok(()), None) => return Ok(RecordSource::Remote),
            (Err(error), Some(order)) => {
                warn!(%error, %id, "backend did not update order, updating local copy");

                order.status = status;
                RecordSource::Local
            }
            (Err(source), None) => {
                return Err(OrdersServiceError::Unreachable {
                    id: id.clone(),
                    source,
                });
            }
        };

        self.store.save_orders(&orders)?;

        info!(%id, %status, ?source, "order updated");

        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use storefront::payments::PaymentReference;
    use testresult::TestResult;

    use crate::{api::MockStorefrontApi, test::fixtures::order};

    use super::*;

    fn ids(orders: &[Sourced<Order>]) -> Vec<(&str, RecordSource)> {
        orders
            .iter()
            .map(|order| (order.id.as_str(), order.source))
            .collect()
    }

    #[tokio::test]
    async fn user_orders_merge_by_id_or_reference() -> TestResult {
        let store = LocalStore::in_memory();
        let mut paid = order("1736762400000", "ada@example.com", 4_120_000);
        paid.payment_reference = Some(PaymentReference::parse("BMP_1_a")?);

        store.save_orders(&[
            paid,
            order("1736762500000", "ada@example.com", 100),
            order("1736762600000", "grace@example.com", 100),
        ])?;

        let mut api = MockStorefrontApi::new();
        api.expect_user_orders().returning(|email| {
            let mut remote = order("7", email, 4_120_000);
            remote.payment_reference = PaymentReference::parse("BMP_1_a").ok();
            Ok(vec![remote])
        });

        let orders = OrdersService::new(Arc::new(api), store)
            .for_user("ada@example.com")
            .await?;

        assert_eq!(
            ids(&orders),
            [
                ("7", RecordSource::Remote),
                ("1736762500000", RecordSource::Local)
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn user_orders_fall_back_to_local() -> TestResult {
        let store = LocalStore::in_memory();
        store.save_orders(&[order("1", "ada@example.com", 100)])?;

        let mut api = MockStorefrontApi::new();
        api.expect_user_orders()
            .returning(|_| Err(ApiError::Timeout));

        let orders = OrdersService::new(Arc::new(api), store)
            .for_user("ada@example.com")
            .await?;

        assert_eq!(ids(&orders), [("1", RecordSource::LocalFallback)]);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_updates_local_copy_when_backend_fails() -> TestResult {
        let store = LocalStore::in_memory();
        store.save_orders(&[order("1", "ada@example.com", 100)])?;

        let mut api = MockStorefrontApi::new();
        api.expect_cancel_order()
            .returning(|_| Err(ApiError::Timeout));

        let source = OrdersService::new(Arc::new(api), store.clone())
            .cancel(&OrderId::new("1"))
            .await?;

        assert_eq!(source, RecordSource::Local);
        assert_eq!(
            store.orders()?.first().map(|o| o.status),
            Some(OrderStatus::Cancelled)
        );

        Ok(())
    }

    #[tokio::test]
    async fn delivered_order_is_not_sent_to_backend() -> TestResult {
        let store = LocalStore::in_memory();
        let mut delivered = order("1", "ada@example.com", 100);
        delivered.status = OrderStatus::Delivered;
        store.save_orders(&[delivered])?;

        let result = OrdersService::new(Arc::new(MockStorefrontApi::new()), store)
            .cancel(&OrderId::new("1"))
            .await;

        assert!(matches!(
            result,
            Err(OrdersServiceError::Order(OrderError::NotCancellable { .. }))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_needs_the_backend() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_update_order_status()
            .returning(|_, _| Err(ApiError::Timeout));

        let service = OrdersService::new(Arc::new(api), LocalStore::in_memory());
        let result = service
            .update_status(&OrderId::new("9"), OrderStatus::Shipped)
            .await;

        assert!(matches!(
            result,
            Err(OrdersServiceError::Unreachable { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn admin_may_move_status_backwards() -> TestResult {
        let store = LocalStore::in_memory();
        let mut shipped = order("1", "ada@example.com", 100);
        shipped.status = OrderStatus::Shipped;
        store.save_orders(&[shipped])?;

        let mut api = MockStorefrontApi::new();
        api.expect_update_order_status()
            .withf(|id, status| id.as_str() == "1" && *status == OrderStatus::Confirmed)
            .times(1)
            .returning(|_, _| Ok(()));

        let source = OrdersService::new(Arc::new(api), store.clone())
            .update_status(&OrderId::new("1"), OrderStatus::Confirmed)
            .await?;

        assert_eq!(source, RecordSource::Remote);
        assert_eq!(
            store.orders()?.first().map(|o| o.status),
            Some(OrderStatus::Confirmed)
        );

        Ok(())
    }

    #[tokio::test]
    async fn admin_may_reopen_delivered_order_offline() -> TestResult {
        let store = LocalStore::in_memory();
        let mut delivered = order("1", "ada@example.com", 100);
        delivered.status = OrderStatus::Delivered;
        store.save_orders(&[delivered])?;

        let mut api = MockStorefrontApi::new();
        api.expect_update_order_status()
            .returning(|_, _| Err(ApiError::Timeout));

        let source = OrdersService::new(Arc::new(api), store.clone())
            .update_status(&OrderId::new("1"), OrderStatus::Pending)
            .await?;

        assert_eq!(source, RecordSource::Local);
        assert_eq!(
            store.orders()?.first().map(|o| o.status),
            Some(OrderStatus::Pending)
        );

        Ok(())
    }
}
