//! Cart session identifiers

use std::fmt;

use jiff::Timestamp;
use rand::Rng;

use crate::ids::{is_timestamped_id, timestamped_id};

const SESSION_PREFIX: &str = "session";

/// Identifier tying an anonymous cart to backend state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session id of the form `session_{millis}_{suffix}`.
    pub fn generate<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        Self(timestamped_id(SESSION_PREFIX, now, rng))
    }

    /// Wrap a previously persisted session id.
    ///
    /// Returns `None` for blank input.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        (!value.is_empty()).then(|| Self(value.to_string()))
    }

    /// Returns true when the id was produced by [`SessionId::generate`].
    pub fn is_generated(&self) -> bool {
        is_timestamped_id(SESSION_PREFIX, &self.0)
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
