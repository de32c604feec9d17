//! Shared field shapes

use std::fmt;

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    normalize::NormalizeError,
    pricing::{major_to_minor, minor_to_major},
    products::split_list,
};

/// Identifier sent either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    /// Numeric id
    Number(i64),

    /// Text id
    Text(String),
}

impl WireId {
    /// Numeric when the text is a plain integer, text otherwise.
    pub fn from_text(id: &str) -> Self {
        id.parse().map_or_else(|_| Self::Text(id.to_string()), Self::Number)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id.trim()),
        }
    }
}

/// List sent either as a JSON array or a comma separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireList {
    /// JSON array
    Items(Vec<String>),

    /// `"S, M, L"`
    Joined(String),
}

impl Default for WireList {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

impl WireList {
    /// Trimmed, non-empty entries.
    pub fn into_items(self) -> Vec<String> {
        match self {
            Self::Items(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            Self::Joined(joined) => split_list(&joined),
        }
    }
}

/// Treat blank and placeholder values as absent.
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != "N/A")
}

/// Parse a timestamp with an offset, a civil date-time (read as UTC) or a bare date (midnight
/// UTC).
pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, NormalizeError> {
    let value = value.trim();

    let parsed = value.parse::<Timestamp>().ok().or_else(|| {
        let datetime = value
            .parse::<DateTime>()
            .ok()
            .or_else(|| value.parse::<Date>().ok().map(|date| date.at(0, 0, 0, 0)))?;

        datetime
            .to_zoned(TimeZone::UTC)
            .ok()
            .map(|zoned| zoned.timestamp())
    });

    parsed.ok_or_else(|| NormalizeError::DateTime(value.to_string()))
}

/// UTC calendar date of anything [`parse_timestamp`] accepts.
pub(crate) fn parse_date(value: &str) -> Result<Date, NormalizeError> {
    parse_timestamp(value).map(|timestamp| timestamp.to_zoned(TimeZone::UTC).date())
}

pub(crate) fn to_minor(amount: Decimal) -> Result<i64, NormalizeError> {
    Ok(major_to_minor(amount)?)
}

pub(crate) fn to_major(minor: i64) -> Decimal {
    minor_to_major(minor)
}
