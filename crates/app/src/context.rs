//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::{ApiError, HttpStorefrontApi, StorefrontApi},
    config::AppConfig,
    services::{
        accounts::AccountService, admin::AdminService, cart::CartService,
        catalog::CatalogService, checkout::CheckoutService, orders::OrdersService,
        payments::PaymentsService,
    },
    storage::{FileStore, LocalStore, StorageError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open local storage")]
    Storage(#[source] StorageError),

    #[error("invalid API URL")]
    Api(#[source] ApiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: CatalogService,
    pub cart: CartService,
    pub accounts: AccountService,
    pub checkout: CheckoutService,
    pub orders: OrdersService,
    pub payments: PaymentsService,
    pub admin: AdminService,
}

impl AppContext {
    /// Wire every service to one API client and one local store.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, store: LocalStore) -> Self {
        let cart = CartService::new(Arc::clone(&api), store.clone());

        Self {
            catalog: CatalogService::new(Arc::clone(&api)),
            checkout: CheckoutService::new(store.clone(), cart.clone()),
            cart,
            accounts: AccountService::new(Arc::clone(&api), store.clone()),
            orders: OrdersService::new(Arc::clone(&api), store.clone()),
            payments: PaymentsService::new(Arc::clone(&api), store.clone()),
            admin: AdminService::new(api, store),
        }
    }

    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory cannot be created or the API URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let store = FileStore::open(&config.data_dir).map_err(AppInitError::Storage)?;
        let api = HttpStorefrontApi::new(&config.api_url, config.auth_timeout())
            .map_err(AppInitError::Api)?;

        Ok(Self::new(Arc::new(api), LocalStore::new(store)))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use testresult::TestResult;

    use crate::config::{LogFormat, LoggingConfig};

    use super::*;

    fn config(api_url: &str, data_dir: PathBuf) -> AppConfig {
        AppConfig {
            api_url: api_url.to_string(),
            data_dir,
            auth_timeout_seconds: 10,
            logging: LoggingConfig {
                log_level: "warn".to_string(),
                log_format: LogFormat::Compact,
            },
        }
    }

    #[test]
    fn from_config_creates_data_dir() -> TestResult {
        let temp = tempfile::tempdir()?;
        let data_dir = temp.path().join("shop");

        AppContext::from_config(&config("http://localhost:5000/api", data_dir.clone()))?;

        assert!(data_dir.is_dir());

        Ok(())
    }

    #[test]
    fn from_config_rejects_bad_url() -> TestResult {
        let temp = tempfile::tempdir()?;
        let result = AppContext::from_config(&config("not a url", temp.path().to_path_buf()));

        assert!(matches!(result, Err(AppInitError::Api(ApiError::InvalidUrl(_)))));

        Ok(())
    }
}
