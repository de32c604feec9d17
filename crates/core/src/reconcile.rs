//! Reconciliation
//!
//! Records fetched from the backend are merged with the copies cached locally. Remote records
//! always win; local records survive only when none of their keys is already present.

use std::{borrow::Borrow, hash::Hash, ops::Deref};

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Where a reconciled record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSource {
    /// Returned by the backend
    Remote,

    /// Cached locally and missing from the backend
    Local,

    /// Cached locally and used because the backend could not be reached
    LocalFallback,
}

impl RecordSource {
    /// Returns true for records that did not come from the backend.
    pub fn is_local(self) -> bool {
        !matches!(self, Self::Remote)
    }
}

/// A record tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    /// The record
    pub record: T,

    /// Where it came from
    pub source: RecordSource,
}

impl<T> Sourced<T> {
    /// Tag a record.
    pub fn new(record: T, source: RecordSource) -> Self {
        Self { record, source }
    }

    /// Drop the provenance.
    pub fn into_inner(self) -> T {
        self.record
    }
}

impl<T> Deref for Sourced<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

/// Merge remote and local records that share a single natural key.
///
/// Every remote record is kept unchanged and in order. Local records whose key is not among the
/// remote keys are appended in order, each at most once. With no remote records at all, the
/// local records are tagged [`RecordSource::LocalFallback`].
pub fn merge_records<T, K, F>(remote: &[T], local: &[T], key_of: F) -> Vec<Sourced<T>>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    merge_records_by_any(remote, local, |record| [key_of(record)])
}

/// Merge remote and local records that can match on any of several keys.
///
/// A local record is dropped when any of its keys is already taken by a remote record or an
/// earlier local record. An empty remote list tags the local records as a fallback.
pub fn merge_records_by_any<T, K, I, F>(remote: &[T], local: &[T], keys_of: F) -> Vec<Sourced<T>>
where
    T: Clone,
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
    F: Fn(&T) -> I,
{
    let local_source = if remote.is_empty() {
        RecordSource::LocalFallback
    } else {
        RecordSource::Local
    };

    let mut seen: FxHashSet<K> = remote.iter().flat_map(&keys_of).collect();
    let mut merged: Vec<Sourced<T>> = remote
        .iter()
        .cloned()
        .map(|record| Sourced::new(record, RecordSource::Remote))
        .collect();

    for record in local {
        let keys: SmallVec<[K; 2]> = keys_of(record).into_iter().collect();

        if keys.iter().any(|key| seen.contains(key)) {
            continue;
        }

        seen.extend(keys);
        merged.push(Sourced::new(record.clone(), local_source));
    }

    merged
}

/// Tag local records as a fallback for an unreachable backend.
pub fn fallback_records<T: Clone>(local: &[T]) -> Vec<Sourced<T>> {
    local
        .iter()
        .cloned()
        .map(|record| Sourced::new(record, RecordSource::LocalFallback))
        .collect()
}

/// Strip provenance from a list of records.
pub fn into_records<T>(sourced: Vec<Sourced<T>>) -> Vec<T> {
    sourced.into_iter().map(Sourced::into_inner).collect()
}

/// Returns true when any record in the list has `key` under `key_of`.
pub fn contains_key<T, K, Q, F>(records: &[T], key: &Q, key_of: F) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
    F: Fn(&T) -> K,
{
    records
        .iter()
        .any(|record| Borrow::<Q>::borrow(&key_of(record)) == key)
}
