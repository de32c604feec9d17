//! Wire format
//!
//! The backend and the local cache store records in a loosely shaped JSON form: amounts in
//! major units, ids as numbers or strings, alternative field names for the same value. The
//! `Wire*` types in this module accept every variant seen in practice and convert to and from the
//! fixed domain entities. Nothing outside this module deals with the loose shapes.

use thiserror::Error;

use crate::{payments::ReferenceError, pricing::PricingError};

pub mod accounts;
pub mod cart;
pub mod catalog;
mod fields;
pub mod orders;

pub use accounts::{WireCustomer, WirePromoValidation, WireUser};
pub use cart::WireCartLine;
pub use catalog::{WireProduct, WireProductDraft, WireProductQuery};
pub use fields::{WireId, WireList};
pub use orders::{WireOrder, WirePayment};

/// Errors raised while converting wire records into domain entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// A required field was absent or null.
    #[error("missing field: {0}")]
    Missing(&'static str),

    /// An amount did not fit in minor units.
    #[error(transparent)]
    Amount(#[from] PricingError),

    /// A timestamp or date could not be parsed.
    #[error("invalid date or time: {0}")]
    DateTime(String),

    /// A status name was not recognised.
    #[error("unknown status: {0}")]
    Status(String),

    /// A promo code had an unknown discount type.
    #[error("unknown promo type: {0}")]
    PromoKind(String),

    /// A payment reference was blank.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Convert every record that can be converted, returning the failures alongside.
pub fn normalize_all<W, T>(records: impl IntoIterator<Item = W>) -> (Vec<T>, Vec<NormalizeError>)
where
    T: TryFrom<W, Error = NormalizeError>,
{
    let mut converted = Vec::new();
    let mut failures = Vec::new();

    for record in records {
        match T::try_from(record) {
            Ok(entity) => converted.push(entity),
            Err(error) => failures.push(error),
        }
    }

    (converted, failures)
}

/// Convert entities back to their wire shape.
pub fn to_wire<'a, T, W>(entities: impl IntoIterator<Item = &'a T>) -> Vec<W>
where
    T: 'a,
    W: From<&'a T>,
{
    entities.into_iter().map(W::from).collect()
}
