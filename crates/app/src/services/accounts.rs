//! Accounts service

use std::sync::Arc;

use jiff::civil::Date;
use storefront::{
    customers::{Credentials, Customer, Password, Registration, User, ValidationError, is_valid_email},
    reconcile::contains_key,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiError, StorefrontApi},
    storage::{LocalStore, StorageError, StorageKey},
};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend refused the request, e.g. unknown credentials or a taken email.
    #[error("{0}")]
    Rejected(String),

    #[error("the server took too long to respond")]
    Timeout,

    #[error("could not reach the server")]
    Unreachable(#[source] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AccountError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Timeout => Self::Timeout,
            ApiError::Status { message, .. } => Self::Rejected(message),
            other => Self::Unreachable(other),
        }
    }
}

/// Registration, sign-in and newsletter.
#[derive(Clone)]
pub struct AccountService {
    api: Arc<dyn StorefrontApi>,
    store: LocalStore,
}

impl AccountService {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, store: LocalStore) -> Self {
        Self { api, store }
    }

    /// Create an account and sign in as it.
    ///
    /// The new user is added to the local registered users backup, dated `today`, unless the
    /// email is already there. A newsletter opt-in is attempted but its failure is only logged.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Validation`] when the form is incomplete or inconsistent.
    /// - [`AccountError::Rejected`] or [`AccountError::Timeout`] when the backend does not create
    ///   the account.
    pub async fn register(&self, form: &Registration, today: Date) -> Result<User, AccountError> {
        let new_user = form.validate()?;
        let customer = self.api.register(&new_user).await?;

        let user = User {
            name: customer.name,
            email: customer.email,
        };

        self.store.save_user(&user)?;

        let mut registered = self.store.registered_users()?;

        if !contains_key(&registered, user.email.as_str(), |c: &Customer| {
            c.email.clone()
        }) {
            registered.push(user.registered_on(today));
            self.store.save_registered_users(&registered)?;
        }

        if form.subscribe_newsletter
            && let Err(error) = self.api.subscribe_newsletter(&user.email).await
        {
            warn!(%error, email = %user.email, "newsletter opt-in failed");
        }

        info!(email = %user.email, "registered");

        Ok(user)
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Validation`] when either field is empty.
    /// - [`AccountError::Rejected`] for unknown credentials.
    /// - [`AccountError::Timeout`] when the backend does not answer in time.
    pub async fn login(&self, email: &str, password: Password) -> Result<User, AccountError> {
        let credentials = Credentials::new(email, password);
        credentials.validate()?;

        let user = self.api.login(&credentials).await?;
        self.store.save_user(&user)?;

        info!(email = %user.email, "signed in");

        Ok(user)
    }

    /// Sign out, forgetting the user, the cart and the cart session.
    ///
    /// # Errors
    ///
    /// Returns an error when local storage cannot be written.
    pub fn logout(&self) -> Result<(), AccountError> {
        for key in [StorageKey::User, StorageKey::Cart, StorageKey::SessionId] {
            self.store.remove(key)?;
        }

        info!("signed out");

        Ok(())
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when local storage cannot be read.
    pub fn current_user(&self) -> Result<Option<User>, AccountError> {
        Ok(self.store.user()?)
    }

    /// Subscribe `email` to the newsletter.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidEmail`] for a malformed address.
    /// - [`AccountError::Rejected`] when the backend refuses it.
    pub async fn subscribe(&self, email: &str) -> Result<(), AccountError> {
        let email = email.trim();

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        self.api.subscribe_newsletter(email).await?;

        Ok(())
    }
}
