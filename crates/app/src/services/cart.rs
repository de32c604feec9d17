//! Cart service
//!
//! Every mutation is sent to the backend first. When the backend cannot be reached the change is
//! applied to the locally cached cart instead. Either way the resulting cart is written back to
//! local storage.

use std::sync::Arc;

use jiff::Timestamp;
use storefront::{
    cart::{Cart, CartError, CartLine, ItemKey, NewCartItem},
    products::Product,
    promotions::PromoValidation,
    reconcile::{RecordSource, Sourced},
    session::SessionId,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::{ApiError, StorefrontApi},
    storage::{LocalStore, StorageError},
};

#[derive(Debug, Error)]
pub enum CartServiceError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("could not check promo code")]
    Promo(#[source] ApiError),
}

/// Cart operations for the current session.
#[derive(Clone)]
pub struct CartService {
    api: Arc<dyn StorefrontApi>,
    store: LocalStore,
}

impl CartService {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, store: LocalStore) -> Self {
        Self { api, store }
    }

    /// The persisted session id, generating and storing one on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when the session id cannot be read or written.
    pub fn session(&self, now: Timestamp) -> Result<SessionId, CartServiceError> {
        if let Some(session) = self.store.session_id()? {
            return Ok(session);
        }

        let session = SessionId::generate(now, &mut rand::thread_rng());
        self.store.save_session_id(&session)?;

        debug!(%session, "started cart session");

        Ok(session)
    }

    /// Load the cart.
    ///
    /// The backend's cart wins when it has lines. An empty backend cart yields the local cart,
    /// and a failed request yields the local cart tagged as a fallback.
    ///
    /// # Errors
    ///
    /// Returns an error when local storage cannot be read or written.
    pub async fn load(&self, now: Timestamp) -> Result<Sourced<Cart>, CartServiceError> {
        let session = self.session(now)?;

        match self.api.get_cart(&session).await {
            Ok(lines) if !lines.is_empty() => {
                let cart = self.mirror(Cart::from_lines(lines))?;

                Ok(Sourced::new(cart, RecordSource::Remote))
            }
            Ok(_) => Ok(Sourced::new(self.local_cart()?, RecordSource::Local)),
            Err(error) => {
                warn!(%error, "loading cart from backend failed, using local cart");

                Ok(Sourced::new(
                    self.local_cart()?,
                    RecordSource::LocalFallback,
                ))
            }
        }
    }

    /// Add `quantity` units of a product variant.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`] when `quantity` is zero.
    /// - A storage error when the cart cannot be persisted.
    pub async fn add(
        &self,
        product: &Product,
        quantity: u32,
        color: Option<String>,
        size: Option<String>,
        now: Timestamp,
    ) -> Result<Cart, CartServiceError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity.into());
        }

        let session = self.session(now)?;
        let item = NewCartItem {
            product_id: product.id.clone(),
            quantity,
            color: color.clone(),
            size: size.clone(),
        };

        let cart = match self.api.add_to_cart(&session, &item).await {
            Ok(lines) => Cart::from_lines(lines),
            Err(error) => {
                warn!(%error, item_key = %item.item_key(), "adding to backend cart failed, adding locally");

                let mut cart = self.local_cart()?;
                cart.add(CartLine::from_product(product, quantity, color, size))?;
                cart
            }
        };

        info!(item_key = %item.item_key(), quantity, "added to cart");

        self.mirror(cart)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] when the backend is unreachable and no local line has `key`.
    /// - A storage error when the cart cannot be persisted.
    pub async fn set_quantity(
        &self,
        key: &ItemKey,
        quantity: u32,
        now: Timestamp,
    ) -> Result<Cart, CartServiceError> {
        let session = self.session(now)?;

        let cart = match self.api.update_cart_item(&session, key, quantity).await {
            Ok(lines) => Cart::from_lines(lines),
            Err(error) => {
                warn!(%error, item_key = %key, "updating backend cart failed, updating locally");

                let mut cart = self.local_cart()?;
                cart.set_quantity(key, quantity)?;
                cart
            }
        };

        self.mirror(cart)
    }

    /// Change a line's quantity by `delta`, removing the line when it reaches zero.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] when no local line has `key`.
    /// - A storage error when the cart cannot be persisted.
    pub async fn adjust(
        &self,
        key: &ItemKey,
        delta: i64,
        now: Timestamp,
    ) -> Result<Cart, CartServiceError> {
        let current = self
            .local_cart()?
            .get(key)
            .map(|line| line.quantity)
            .ok_or_else(|| CartError::NotFound(key.clone()))?;

        let next = i64::from(current).saturating_add(delta).max(0);
        let next = u32::try_from(next).unwrap_or(u32::MAX);

        self.set_quantity(key, next, now).await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] when the backend is unreachable and no local line has `key`.
    /// - A storage error when the cart cannot be persisted.
    pub async fn remove(&self, key: &ItemKey, now: Timestamp) -> Result<Cart, CartServiceError> {
        let session = self.session(now)?;
        let mut cart = self.local_cart()?;

        match self.api.remove_cart_item(&session, key).await {
            Ok(()) => {
                if cart.get(key).is_some() {
                    cart.remove(key)?;
                }
            }
            Err(error) => {
                warn!(%error, item_key = %key, "removing from backend cart failed, removing locally");

                cart.remove(key)?;
            }
        }

        self.mirror(cart)
    }

    /// Empty the cart on the backend, when reachable, and locally.
    ///
    /// # Errors
    ///
    /// Returns an error when the local cart cannot be written.
    pub async fn clear(&self, now: Timestamp) -> Result<(), CartServiceError> {
        let session = self.session(now)?;

        if let Err(error) = self.api.clear_cart(&session).await {
            warn!(%error, "clearing backend cart failed, clearing local cart only");
        }

        self.store.save_cart(&[])?;

        Ok(())
    }

    /// Check a promo code with the backend.
    ///
    /// # Errors
    ///
    /// Returns [`CartServiceError::Promo`] when the backend cannot be asked. A rejected code is
    /// an `Ok` [`PromoValidation::Invalid`].
    pub async fn apply_promo(&self, code: &str) -> Result<PromoValidation, CartServiceError> {
        let validation = self
            .api
            .validate_promo(code)
            .await
            .map_err(CartServiceError::Promo)?;

        match &validation {
            PromoValidation::Valid { promo, .. } => info!(code = promo.code(), "promo applied"),
            PromoValidation::Invalid { message } => info!(code, reason = %message, "promo rejected"),
        }

        Ok(validation)
    }

    fn local_cart(&self) -> Result<Cart, StorageError> {
        Ok(Cart::from_lines(self.store.cart()?))
    }

    fn mirror(&self, cart: Cart) -> Result<Cart, CartServiceError> {
        self.store.save_cart(cart.lines())?;

        Ok(cart)
    }
}
