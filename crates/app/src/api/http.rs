//! HTTP client for the storefront backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use storefront::{
    cart::{CartLine, ItemKey, NewCartItem},
    catalog::ProductQuery,
    customers::{Credentials, Customer, NewUser, User},
    normalize::{
        WireCartLine, WireCustomer, WireOrder, WirePayment, WireProduct, WireProductDraft,
        WireProductQuery, WirePromoValidation, WireUser,
    },
    orders::{Order, OrderId, OrderStatus},
    payments::PaymentRecord,
    products::{Product, ProductDraft, ProductId},
    promotions::PromoValidation,
    session::SessionId,
};
use tracing::debug;

use super::{
    ApiError, StorefrontApi,
    bodies::{
        AddToCartBody, CartEnvelope, EmailBody, ErrorBody, ItemKeyBody, LoginBody, ProductEnvelope,
        PromoBody, RegisterBody, StatusBody, UpdateCartBody, UserEnvelope,
    },
};
use crate::wire::lenient;

/// [`StorefrontApi`] over the backend's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    http: Client,
    base_url: Url,
    auth_timeout: Duration,
}

impl HttpStorefrontApi {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// Registration and login give up after `auth_timeout`; other requests have no deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when `base_url` is not an absolute URL with a path.
    pub fn new(base_url: &str, auth_timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|error| ApiError::InvalidUrl(format!("{base_url}: {error}")))?;

        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url: parsed,
            auth_timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn checked(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        debug!(url = %response.url(), %status, "backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error.or(body.message))
            .unwrap_or(text);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        Ok(Self::checked(request).await?.json().await?)
    }

    async fn execute(request: RequestBuilder) -> Result<(), ApiError> {
        Self::checked(request).await?;

        Ok(())
    }

    async fn cart_from(request: RequestBuilder) -> Result<Vec<CartLine>, ApiError> {
        let envelope: CartEnvelope = Self::fetch(request).await?;

        Ok(lenient("cart", envelope.cart))
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let request = self
            .http
            .get(self.endpoint(&["products"])?)
            .query(&WireProductQuery::from(query));

        let products: Vec<WireProduct> = Self::fetch(request).await?;

        Ok(lenient("products", products))
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let request = self.http.get(self.endpoint(&["products", id.as_str()])?);
        let product: WireProduct = Self::fetch(request).await?;

        Ok(Product::try_from(product)?)
    }

    async fn get_cart(&self, session: &SessionId) -> Result<Vec<CartLine>, ApiError> {
        let request = self.http.get(self.endpoint(&["cart", session.as_str()])?);
        let lines: Vec<WireCartLine> = Self::fetch(request).await?;

        Ok(lenient("cart", lines))
    }

    async fn add_to_cart(
        &self,
        session: &SessionId,
        item: &NewCartItem,
    ) -> Result<Vec<CartLine>, ApiError> {
        let body = AddToCartBody {
            product_id: item.product_id.as_str(),
            quantity: item.quantity,
            size: item.size.as_deref(),
            color: item.color.as_deref(),
        };

        let request = self
            .http
            .post(self.endpoint(&["cart", session.as_str(), "add"])?)
            .json(&body);

        Self::cart_from(request).await
    }

    async fn update_cart_item(
        &self,
        session: &SessionId,
        key: &ItemKey,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        let body = UpdateCartBody {
            item_key: key.as_str(),
            quantity,
        };

        let request = self
            .http
            .put(self.endpoint(&["cart", session.as_str(), "update"])?)
            .json(&body);

        Self::cart_from(request).await
    }

    async fn remove_cart_item(&self, session: &SessionId, key: &ItemKey) -> Result<(), ApiError> {
        let request = self
            .http
            .delete(self.endpoint(&["cart", session.as_str(), "remove"])?)
            .json(&ItemKeyBody {
                item_key: key.as_str(),
            });

        Self::execute(request).await
    }

    async fn clear_cart(&self, session: &SessionId) -> Result<(), ApiError> {
        let request = self
            .http
            .delete(self.endpoint(&["cart", session.as_str(), "clear"])?);

        Self::execute(request).await
    }

    async fn subscribe_newsletter(&self, email: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.endpoint(&["newsletter", "subscribe"])?)
            .json(&EmailBody { email });

        Self::execute(request).await
    }

    async fn validate_promo(&self, code: &str) -> Result<PromoValidation, ApiError> {
        let code = code.trim();
        let request = self
            .http
            .post(self.endpoint(&["promo", "validate"])?)
            .json(&PromoBody { code });

        let validation: WirePromoValidation = Self::fetch(request).await?;

        Ok(validation.into_validation(code)?)
    }

    async fn register(&self, user: &NewUser) -> Result<Customer, ApiError> {
        let body = RegisterBody {
            name: &user.name,
            email: &user.email,
            password: user.password.expose(),
        };

        let request = self
            .http
            .post(self.endpoint(&["auth", "register"])?)
            .timeout(self.auth_timeout)
            .json(&body);

        let envelope: UserEnvelope<WireCustomer> = Self::fetch(request).await?;

        Ok(Customer::try_from(envelope.user)?)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = LoginBody {
            email: &credentials.email,
            password: credentials.password.expose(),
        };

        let request = self
            .http
            .post(self.endpoint(&["auth", "login"])?)
            .timeout(self.auth_timeout)
            .json(&body);

        let envelope: UserEnvelope<WireUser> = Self::fetch(request).await?;

        Ok(User::try_from(envelope.user)?)
    }

    async fn user_orders(&self, email: &str) -> Result<Vec<Order>, ApiError> {
        let request = self.http.get(self.endpoint(&["orders", "user", email])?);
        let orders: Vec<WireOrder> = Self::fetch(request).await?;

        Ok(lenient("orders", orders))
    }

    async fn cancel_order(&self, id: &OrderId) -> Result<(), ApiError> {
        let request = self
            .http
            .put(self.endpoint(&["orders", id.as_str(), "cancel"])?);

        Self::execute(request).await
    }

    async fn admin_users(&self) -> Result<Vec<Customer>, ApiError> {
        let request = self.http.get(self.endpoint(&["admin", "users"])?);
        let users: Vec<WireCustomer> = Self::fetch(request).await?;

        Ok(lenient("users", users))
    }

    async fn delete_user(&self, email: &str) -> Result<(), ApiError> {
        let request = self.http.delete(self.endpoint(&["admin", "users", email])?);

        Self::execute(request).await
    }

    async fn admin_orders(&self) -> Result<Vec<Order>, ApiError> {
        let request = self.http.get(self.endpoint(&["admin", "orders"])?);
        let orders: Vec<WireOrder> = Self::fetch(request).await?;

        Ok(lenient("orders", orders))
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .http
            .put(self.endpoint(&["admin", "orders", id.as_str()])?)
            .json(&StatusBody {
                status: status.as_str(),
            });

        Self::execute(request).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let request = self
            .http
            .post(self.endpoint(&["admin", "products"])?)
            .json(&WireProductDraft::from(draft));

        let envelope: ProductEnvelope = Self::fetch(request).await?;

        Ok(Product::try_from(envelope.product)?)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let request = self
            .http
            .put(self.endpoint(&["admin", "products", id.as_str()])?)
            .json(&WireProductDraft::from(draft));

        let envelope: ProductEnvelope = Self::fetch(request).await?;

        Ok(Product::try_from(envelope.product)?)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let request = self
            .http
            .delete(self.endpoint(&["admin", "products", id.as_str()])?);

        Self::execute(request).await
    }

    async fn payment_history(&self, email: &str) -> Result<Vec<PaymentRecord>, ApiError> {
        let request = self
            .http
            .get(self.endpoint(&["payments", "history", email])?);

        let payments: Vec<WirePayment> = Self::fetch(request).await?;

        Ok(lenient("payments", payments))
    }

    async fn all_payments(&self) -> Result<Vec<PaymentRecord>, ApiError> {
        let request = self
            .http
            .get(self.endpoint(&["payments", "history", "all"])?);

        let payments: Vec<WirePayment> = Self::fetch(request).await?;

        Ok(lenient("payments", payments))
    }
}
