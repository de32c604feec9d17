//! Catalog service

use std::sync::Arc;

use storefront::{
    catalog::{ProductFilter, ProductQuery, SortOrder, browse},
    products::{Product, ProductId},
};
use tracing::debug;

use crate::api::{ApiError, StorefrontApi};

/// Product listing. The catalog has no local copy.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn StorefrontApi>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Products the backend returns for `query`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.api.list_products(query).await
    }

    /// Products matching `filter`, in `order`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached.
    pub async fn browse(
        &self,
        query: &ProductQuery,
        filter: &ProductFilter,
        order: SortOrder,
    ) -> Result<Vec<Product>, ApiError> {
        let products = self.list(query).await?;
        let matches: Vec<Product> = browse(&products, filter, order)
            .into_iter()
            .cloned()
            .collect();

        debug!(
            listed = products.len(),
            shown = matches.len(),
            "filtered catalog"
        );

        Ok(matches)
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be reached or has no such product.
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.api.get_product(id).await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{api::MockStorefrontApi, test::fixtures::product};

    use super::*;

    #[tokio::test]
    async fn browse_filters_and_sorts_backend_listing() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_list_products().returning(|_| {
            Ok(vec![
                product("1", 1_800_000),
                product("2", 450_000),
                product("3", 30_000_000),
            ])
        });

        let catalog = CatalogService::new(Arc::new(api));
        let shown = catalog
            .browse(
                &ProductQuery::default(),
                &ProductFilter::default(),
                SortOrder::PriceLowToHigh,
            )
            .await?;

        let ids: Vec<&str> = shown.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["2", "1"]);

        Ok(())
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let mut api = MockStorefrontApi::new();
        api.expect_get_product()
            .returning(|_| Err(ApiError::Timeout));

        let catalog = CatalogService::new(Arc::new(api));

        assert!(matches!(
            catalog.product(&ProductId::new("1")).await,
            Err(ApiError::Timeout)
        ));
    }
}
