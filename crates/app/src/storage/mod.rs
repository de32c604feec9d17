//! Local storage
//!
//! The client keeps a copy of the cart, the signed-in user, orders, payments and registered
//! users so it keeps working while the backend is unreachable. Every key holds one JSON document
//! in the backend's wire shape.

use std::{fmt, io, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use storefront::{
    cart::CartLine,
    customers::{Customer, User},
    normalize::{
        NormalizeError, WireCartLine, WireCustomer, WireOrder, WirePayment, WireUser, to_wire,
    },
    orders::Order,
    payments::PaymentRecord,
    session::SessionId,
};
use thiserror::Error;
use tracing::warn;

use crate::wire::lenient;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Keys of the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Cart lines
    Cart,

    /// Orders placed on this client or fetched for the signed-in user
    UserOrders,

    /// Payments made on this client
    PaymentHistory,

    /// Backup of registered users
    RegisteredUsers,

    /// Signed-in user
    User,

    /// Cart session id
    SessionId,
}

impl StorageKey {
    /// Every key.
    pub const ALL: [Self; 6] = [
        Self::Cart,
        Self::UserOrders,
        Self::PaymentHistory,
        Self::RegisteredUsers,
        Self::User,
        Self::SessionId,
    ];

    /// Name the key is stored under.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::UserOrders => "userOrders",
            Self::PaymentHistory => "paymentHistory",
            Self::RegisteredUsers => "registeredUsers",
            Self::User => "user",
            Self::SessionId => "sessionId",
        }
    }
}

/// Local storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("local storage i/o failed")]
    Io(#[from] io::Error),

    /// A stored document is not valid JSON for its key.
    #[error("local storage holds invalid JSON")]
    Json(#[from] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("local storage lock poisoned")]
    Poisoned,
}

/// Raw string storage keyed by [`StorageKey`].
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

/// Typed access to the local store.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    /// Wrap a key/value store.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, StorageError> {
        self.inner
            .get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        self.inner.set(key, &serde_json::to_string(value)?)
    }

    fn load_list<W, T>(&self, key: StorageKey) -> Result<Vec<T>, StorageError>
    where
        W: DeserializeOwned,
        T: TryFrom<W, Error = NormalizeError>,
    {
        let records: Vec<W> = self.load(key)?.unwrap_or_default();

        Ok(lenient(key.as_str(), records))
    }

    /// Remove `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    pub fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    /// Cached cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored cart cannot be read.
    pub fn cart(&self) -> Result<Vec<CartLine>, StorageError> {
        self.load_list::<WireCartLine, _>(StorageKey::Cart)
    }

    /// Replace the cached cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart cannot be written.
    pub fn save_cart(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        self.save(StorageKey::Cart, &to_wire::<_, WireCartLine>(lines))
    }

    /// Cached orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored orders cannot be read.
    pub fn orders(&self) -> Result<Vec<Order>, StorageError> {
        self.load_list::<WireOrder, _>(StorageKey::UserOrders)
    }

    /// Replace the cached orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the orders cannot be written.
    pub fn save_orders(&self, orders: &[Order]) -> Result<(), StorageError> {
        self.save(StorageKey::UserOrders, &to_wire::<_, WireOrder>(orders))
    }

    /// Cached payments.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored payments cannot be read.
    pub fn payments(&self) -> Result<Vec<PaymentRecord>, StorageError> {
        self.load_list::<WirePayment, _>(StorageKey::PaymentHistory)
    }

    /// Replace the cached payments.
    ///
    /// # Errors
    ///
    /// Returns an error when the payments cannot be written.
    pub fn save_payments(&self, payments: &[PaymentRecord]) -> Result<(), StorageError> {
        self.save(
            StorageKey::PaymentHistory,
            &to_wire::<_, WirePayment>(payments),
        )
    }

    /// Backup list of registered users.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored list cannot be read.
    pub fn registered_users(&self) -> Result<Vec<Customer>, StorageError> {
        self.load_list::<WireCustomer, _>(StorageKey::RegisteredUsers)
    }

    /// Replace the registered users backup.
    ///
    /// # Errors
    ///
    /// Returns an error when the list cannot be written.
    pub fn save_registered_users(&self, users: &[Customer]) -> Result<(), StorageError> {
        self.save(
            StorageKey::RegisteredUsers,
            &to_wire::<_, WireCustomer>(users),
        )
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored user cannot be read.
    pub fn user(&self) -> Result<Option<User>, StorageError> {
        let Some(wire) = self.load::<WireUser>(StorageKey::User)? else {
            return Ok(None);
        };

        match User::try_from(wire) {
            Ok(user) => Ok(Some(user)),
            Err(error) => {
                warn!(%error, "ignoring unreadable stored user");
                Ok(None)
            }
        }
    }

    /// Store the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error when the user cannot be written.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.save(StorageKey::User, &WireUser::from(user))
    }

    /// The persisted cart session id.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored id cannot be read.
    pub fn session_id(&self) -> Result<Option<SessionId>, StorageError> {
        Ok(self
            .load::<String>(StorageKey::SessionId)?
            .and_then(|raw| SessionId::parse(&raw)))
    }

    /// Persist the cart session id.
    ///
    /// # Errors
    ///
    /// Returns an error when the id cannot be written.
    pub fn save_session_id(&self, session: &SessionId) -> Result<(), StorageError> {
        self.save(StorageKey::SessionId, session.as_str())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::fixtures::{line, order, payment};

    use super::*;

    #[test]
    fn cart_round_trips_through_wire_shape() -> TestResult {
        let store = LocalStore::in_memory();
        let lines = vec![line("1", 1_800_000, 2), line("2", 450_000, 1)];

        store.save_cart(&lines)?;

        assert_eq!(store.cart()?, lines);

        Ok(())
    }

    #[test]
    fn missing_keys_read_as_empty() -> TestResult {
        let store = LocalStore::in_memory();

        assert!(store.cart()?.is_empty());
        assert!(store.orders()?.is_empty());
        assert_eq!(store.user()?, None);
        assert_eq!(store.session_id()?, None);

        Ok(())
    }

    #[test]
    fn malformed_records_are_skipped() -> TestResult {
        let memory = MemoryStore::default();
        memory.set(
            StorageKey::UserOrders,
            r#"[
                {"id": 1, "customer_email": "ada@example.com", "total": 100, "created_at": "2025-01-13"},
                {"id": 2, "total": 100, "created_at": "2025-01-13"}
            ]"#,
        )?;
        let store = LocalStore::new(memory);

        let orders = store.orders()?;

        assert_eq!(orders.len(), 1);
        assert_eq!(orders.first().map(|o| o.id.as_str()), Some("1"));

        Ok(())
    }

    #[test]
    fn invalid_json_is_an_error() -> TestResult {
        let memory = MemoryStore::default();
        memory.set(StorageKey::Cart, "{not json")?;
        let store = LocalStore::new(memory);

        assert!(matches!(store.cart(), Err(StorageError::Json(_))));

        Ok(())
    }

    #[test]
    fn orders_and_payments_round_trip() -> TestResult {
        let store = LocalStore::in_memory();
        let orders = vec![order("1736762400000", "ada@example.com", 4_120_000)];
        let payments = vec![payment("BMP_1_a", Some("1736762400000"), 4_120_000)];

        store.save_orders(&orders)?;
        store.save_payments(&payments)?;

        assert_eq!(store.orders()?, orders);
        assert_eq!(store.payments()?, payments);

        Ok(())
    }

    #[test]
    fn session_id_and_user_persist() -> TestResult {
        let store = LocalStore::in_memory();
        let session = SessionId::parse("session_1_abc").ok_or("blank session")?;
        let user = User {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };

        store.save_session_id(&session)?;
        store.save_user(&user)?;

        assert_eq!(store.session_id()?, Some(session));
        assert_eq!(store.user()?, Some(user));

        store.remove(StorageKey::User)?;
        assert_eq!(store.user()?, None);

        Ok(())
    }

    #[test]
    fn key_names_match_browser_storage() {
        let names: Vec<&str> = StorageKey::ALL.iter().map(|key| key.as_str()).collect();

        assert_eq!(
            names,
            [
                "cart",
                "userOrders",
                "paymentHistory",
                "registeredUsers",
                "user",
                "sessionId"
            ]
        );
    }
}
