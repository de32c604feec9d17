//! Lenient conversion of record lists

use storefront::normalize::{NormalizeError, normalize_all};
use tracing::warn;

/// Convert every readable record, logging and dropping the rest.
pub(crate) fn lenient<W, T>(source: &'static str, records: Vec<W>) -> Vec<T>
where
    T: TryFrom<W, Error = NormalizeError>,
{
    let (records, failures) = normalize_all(records);

    for failure in &failures {
        warn!(source, %failure, "dropping malformed record");
    }

    records
}
