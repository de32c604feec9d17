//! Admin service
//!
//! The dashboard reads users, products, orders and payments concurrently. Each list falls back
//! to the local copy on its own, so one unreachable endpoint does not blank the dashboard.

use std::sync::Arc;

use jiff::civil::Date;
use storefront::{
    analytics::{CsvExportError, DashboardSnapshot, payments_csv, summarize, users_csv},
    catalog::ProductQuery,
    customers::{Customer, normalize_email},
    orders::Order,
    payments::PaymentRecord,
    products::{Product, ProductDraft, ProductDraftError, ProductId},
    reconcile::{RecordSource, Sourced, fallback_records, into_records, merge_records},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiError, StorefrontApi},
    services::{orders::OrdersService, payments::PaymentsService},
    storage::{LocalStore, StorageError},
};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Draft(#[from] ProductDraftError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] CsvExportError),
}

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Headline figures
    pub snapshot: DashboardSnapshot,

    /// Registered users
    pub users: Vec<Sourced<Customer>>,

    /// Catalog, empty when the backend is unreachable
    pub products: Vec<Product>,

    /// Every order
    pub orders: Vec<Sourced<Order>>,

    /// Every payment
    pub payments: Vec<Sourced<PaymentRecord>>,
}

/// Store administration.
#[derive(Clone)]
pub struct AdminService {
    api: Arc<dyn StorefrontApi>,
    store: LocalStore,
    orders: OrdersService,
    payments: PaymentsService,
}

impl AdminService {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, store: LocalStore) -> Self {
        Self {
            orders: OrdersService::new(Arc::clone(&api), store.clone()),
            payments: PaymentsService::new(Arc::clone(&api), store.clone()),
            api,
            store,
        }
    }

    /// Registered users: the backend's, followed by locally registered ones it does not know.
    ///
    /// # Errors
    ///
    /// Returns an error when the local user backup cannot be read.
    pub async fn users(&self) -> Result<Vec<Sourced<Customer>>, StorageError> {
        let local = self.store.registered_users()?;

        match self.api.admin_users().await {
            Ok(remote) => Ok(merge_records(&remote, &local, |user| {
                normalize_email(&user.email)
            })),
            Err(error) => {
                warn!(%error, "loading users failed, using registered users backup");

                Ok(fallback_records(&local))
            }
        }
    }

    /// Collect every list and summarise it for `today`.
    ///
    /// # Errors
    ///
    /// Returns an error when a local copy cannot be read.
    pub async fn dashboard(&self, today: Date) -> Result<Dashboard, StorageError> {
        let query = ProductQuery::default();

        let (users, products, orders, payments) = tokio::join!(
            self.users(),
            self.api.list_products(&query),
            self.orders.admin_list(),
            self.payments.all(),
        );

        let (users, orders, payments) = (users?, orders?, payments?);
        let products = products.unwrap_or_else(|error| {
            warn!(%error, "loading products failed, stock figures unavailable");

            Vec::new()
        });

        let snapshot = summarize(
            &into_records(users.clone()),
            &products,
            &into_records(orders.clone()),
            &into_records(payments.clone()),
            today,
        );

        Ok(Dashboard {
            snapshot,
            users,
            products,
            orders,
            payments,
        })
    }

    /// Delete a user account.
    ///
    /// The user is always dropped from the local backup. Returns [`RecordSource::Local`] when
    /// only the backup knew the user.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the backend refused and the backup has no such user.
    pub async fn delete_user(&self, email: &str) -> Result<RecordSource, AdminError> {
        let email = normalize_email(email);
        let mut registered = self.store.registered_users()?;
        let before = registered.len();

        registered.retain(|user| normalize_email(&user.email) != email);

        let backed_up = registered.len() != before;
        let source = match self.api.delete_user(&email).await {
            Ok(()) => RecordSource::Remote,
            Err(error) if backed_up => {
                warn!(%error, email, "backend did not delete user, removing from backup");

                RecordSource::Local
            }
            Err(error) => return Err(error.into()),
        };

        if backed_up {
            self.store.save_registered_users(&registered)?;
        }

        info!(email, ?source, "user deleted");

        Ok(source)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// - [`ProductDraftError`] when the form is incomplete.
    /// - [`ApiError`] when the backend does not create it.
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, AdminError> {
        draft.validate()?;

        let product = self.api.create_product(draft).await?;
        info!(id = %product.id, name = %product.name, "product created");

        Ok(product)
    }

    /// Replace a product's details.
    ///
    /// # Errors
    ///
    /// See [`AdminService::create_product`].
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, AdminError> {
        draft.validate()?;

        let product = self.api.update_product(id, draft).await?;
        info!(%id, "product updated");

        Ok(product)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend does not delete it.
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AdminError> {
        self.api.delete_product(id).await?;
        info!(%id, "product deleted");

        Ok(())
    }

    /// Users as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error when the local user backup cannot be read or the CSV cannot be written.
    pub async fn export_users(&self) -> Result<String, AdminError> {
        Ok(users_csv(&into_records(self.users().await?))?)
    }

    /// Payments as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error when local payments cannot be read or the CSV cannot be written.
    pub async fn export_payments(&self) -> Result<String, AdminError> {
        Ok(payments_csv(&into_records(self.payments.all().await?))?)
    }
}
