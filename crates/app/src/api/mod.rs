//! Storefront REST API

use async_trait::async_trait;
use mockall::automock;
use storefront::{
    cart::{CartLine, ItemKey, NewCartItem},
    catalog::ProductQuery,
    customers::{Credentials, Customer, NewUser, User},
    normalize::NormalizeError,
    orders::{Order, OrderId, OrderStatus},
    payments::PaymentRecord,
    products::{Product, ProductDraft, ProductId},
    promotions::PromoValidation,
    session::SessionId,
};
use thiserror::Error;

mod bodies;
mod http;

pub use http::HttpStorefrontApi;

/// Errors raised by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot carry path segments.
    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),

    /// Transport failure or an unreadable response body.
    #[error("request failed")]
    Http(#[source] reqwest::Error),

    /// The request ran past its deadline.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,

        /// `error` or `message` field of the response, or its raw body
        message: String,
    },

    /// The response did not describe a valid record.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error)
        }
    }
}

impl ApiError {
    /// Message the backend gave for a rejected request.
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Backend operations used by the client.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// List products matching `query`.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError>;

    /// Fetch one product.
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// Cart lines held for `session`.
    async fn get_cart(&self, session: &SessionId) -> Result<Vec<CartLine>, ApiError>;

    /// Add an item and return the updated cart.
    async fn add_to_cart(
        &self,
        session: &SessionId,
        item: &NewCartItem,
    ) -> Result<Vec<CartLine>, ApiError>;

    /// Set a line's quantity and return the updated cart. Zero removes the line.
    async fn update_cart_item(
        &self,
        session: &SessionId,
        key: &ItemKey,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError>;

    /// Remove a line.
    async fn remove_cart_item(&self, session: &SessionId, key: &ItemKey) -> Result<(), ApiError>;

    /// Empty the cart.
    async fn clear_cart(&self, session: &SessionId) -> Result<(), ApiError>;

    /// Add `email` to the newsletter.
    async fn subscribe_newsletter(&self, email: &str) -> Result<(), ApiError>;

    /// Ask whether `code` is a valid promo code.
    async fn validate_promo(&self, code: &str) -> Result<PromoValidation, ApiError>;

    /// Create an account. Subject to the auth timeout.
    async fn register(&self, user: &NewUser) -> Result<Customer, ApiError>;

    /// Sign in. Subject to the auth timeout.
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;

    /// Orders placed by `email`.
    async fn user_orders(&self, email: &str) -> Result<Vec<Order>, ApiError>;

    /// Cancel an order.
    async fn cancel_order(&self, id: &OrderId) -> Result<(), ApiError>;

    /// Every registered user.
    async fn admin_users(&self) -> Result<Vec<Customer>, ApiError>;

    /// Delete a user account.
    async fn delete_user(&self, email: &str) -> Result<(), ApiError>;

    /// Every order.
    async fn admin_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// Change an order's status.
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus)
    -> Result<(), ApiError>;

    /// Add a product to the catalog.
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError>;

    /// Replace a product's details.
    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError>;

    /// Remove a product from the catalog.
    async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError>;

    /// Payments made by `email`.
    async fn payment_history(&self, email: &str) -> Result<Vec<PaymentRecord>, ApiError>;

    /// Every payment.
    async fn all_payments(&self) -> Result<Vec<PaymentRecord>, ApiError>;
}
