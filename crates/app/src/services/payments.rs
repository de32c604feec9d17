//! Payments service

use std::sync::Arc;

use storefront::{
    payments::{PaymentRecord, backfill_items},
    reconcile::{RecordSource, Sourced, fallback_records, merge_records},
};
use tracing::warn;

use crate::{
    api::StorefrontApi,
    storage::{LocalStore, StorageError},
};

/// Payment history.
#[derive(Clone)]
pub struct PaymentsService {
    api: Arc<dyn StorefrontApi>,
    store: LocalStore,
}

impl PaymentsService {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, store: LocalStore) -> Self {
        Self { api, store }
    }

    /// Payments made by `email`: the backend's, followed by local ones with other references.
    ///
    /// Payments without items get them from the local order with the same payment reference or
    /// order id.
    ///
    /// # Errors
    ///
    /// Returns an error when local payments or orders cannot be read.
    pub async fn history(&self, email: &str) -> Result<Vec<Sourced<PaymentRecord>>, StorageError> {
        let orders = self.store.orders()?;
        let mut local: Vec<PaymentRecord> = self
            .store
            .payments()?
            .into_iter()
            .filter(|payment| {
                payment
                    .customer_email
                    .as_deref()
                    .is_none_or(|owner| owner.eq_ignore_ascii_case(email.trim()))
            })
            .collect();

        backfill_items(&mut local, &orders);

        match self.api.payment_history(email).await {
            Ok(mut remote) => {
                backfill_items(&mut remote, &orders);

                Ok(merge_records(&remote, &local, |payment| {
                    payment.reference.clone()
                }))
            }
            Err(error) => {
                warn!(%error, email, "loading payments from backend failed, using local payments");

                Ok(fallback_records(&local))
            }
        }
    }

    /// Every payment, for the admin dashboard. Falls back to local payments.
    ///
    /// # Errors
    ///
    /// Returns an error when local payments cannot be read.
    pub async fn all(&self) -> Result<Vec<Sourced<PaymentRecord>>, StorageError> {
        match self.api.all_payments().await {
            Ok(remote) => Ok(remote
                .into_iter()
                .map(|payment| Sourced::new(payment, RecordSource::Remote))
                .collect()),
            Err(error) => {
                warn!(%error, "loading all payments failed, using local payments");

                Ok(fallback_records(&self.store.payments()?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use storefront::payments::PaymentReference;
    use testresult::TestResult;

    use crate::{
        api::{ApiError, MockStorefrontApi},
        test::fixtures::{line, order, payment},
    };

    use super::*;

    fn references(payments: &[Sourced<PaymentRecord>]) -> Vec<(&str, RecordSource)> {
        payments
            .iter()
            .map(|payment| (payment.reference.as_str(), payment.source))
            .collect()
    }

    #[tokio::test]
    async fn history_merges_by_reference_and_backfills_items() -> TestResult {
        let store = LocalStore::in_memory();
        let mut placed = order("1736762400000", "ada@example.com", 3_600_000);
        placed.items = vec![line("1", 1_800_000, 2)];
        placed.payment_reference = Some(PaymentReference::parse("BMP_1_a")?);
        store.save_orders(&[placed])?;

        let mut mine = payment("BMP_2_b", None, 100);
        mine.customer_email = Some("ada@example.com".to_string());
        let mut theirs = payment("BMP_3_c", None, 100);
        theirs.customer_email = Some("grace@example.com".to_string());

        store.save_payments(&[payment("BMP_1_a", None, 3_600_000), mine, theirs])?;

        let mut api = MockStorefrontApi::new();
        api.expect_payment_history()
            .returning(|_| Ok(vec![payment("BMP_1_a", Some("7"), 3_600_000)]));

        let history = PaymentsService::new(Arc::new(api), store)
            .history("ada@example.com")
            .await?;

        assert_eq!(
            references(&history),
            [
                ("BMP_1_a", RecordSource::Remote),
                ("BMP_2_b", RecordSource::Local)
            ]
        );
        assert_eq!(history.first().map(|p| p.items.len()), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn all_payments_fall_back_to_local() -> TestResult {
        let store = LocalStore::in_memory();
        store.save_payments(&[payment("BMP_1_a", None, 100)])?;

        let mut api = MockStorefrontApi::new();
        api.expect_all_payments()
            .returning(|| Err(ApiError::Timeout));

        let all = PaymentsService::new(Arc::new(api), store).all().await?;

        assert_eq!(references(&all), [("BMP_1_a", RecordSource::LocalFallback)]);

        Ok(())
    }
}
