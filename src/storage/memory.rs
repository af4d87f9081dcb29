//! In-memory ordered record store.

use super::{DEFAULT_INDEX_FIELD, RecordStore, StoreStats};
use crate::compute::range::KeyRange;
use crate::error::{QuadscanError, Result};
use parking_lot::RwLock;
use quadscan_types::Record;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::future::{Future, ready};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};

/// Records keyed by (quadkey, id), so equal quadkeys stay distinct.
type IndexKey = (String, String);

/// In-memory store ordered by quadkey.
///
/// Holds records in a `BTreeMap` so range scans are the same ordered walk an
/// external store would do. Only one field is indexed.
pub struct MemoryStore {
    field: String,
    inner: RwLock<Inner>,
    scans: AtomicU64,
    returned: AtomicU64,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<IndexKey, Record>,
    ids: FxHashSet<String>,
}

impl MemoryStore {
    /// Create an empty store indexing [`DEFAULT_INDEX_FIELD`].
    pub fn new() -> Self {
        Self::with_field(DEFAULT_INDEX_FIELD)
    }

    /// Create an empty store answering scans on `field`.
    pub fn with_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            inner: RwLock::new(Inner::default()),
            scans: AtomicU64::new(0),
            returned: AtomicU64::new(0),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    fn insert(&self, record: Record) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.ids.insert(record.id().to_string()) {
            return Err(QuadscanError::Storage(format!(
                "Record '{}' already exists",
                record.id()
            )));
        }
        let key = (record.quadkey().to_string(), record.id().to_string());
        inner.records.insert(key, record);
        Ok(())
    }

    fn range(&self, field: &str, range: &KeyRange) -> Result<Vec<Record>> {
        if field != self.field {
            return Err(QuadscanError::Storage(format!(
                "Field '{}' is not indexed (indexed field is '{}')",
                field, self.field
            )));
        }

        let lower = Bound::Included((range.lower().to_string(), String::new()));
        let upper = match range.upper() {
            Some(upper) => Bound::Excluded((upper.to_string(), String::new())),
            None => Bound::Unbounded,
        };

        let inner = self.inner.read();
        let records: Vec<Record> = inner
            .records
            .range((lower, upper))
            .map(|(_, record)| record.clone())
            .collect();

        self.scans.fetch_add(1, Ordering::Relaxed);
        self.returned
            .fetch_add(records.len() as u64, Ordering::Relaxed);
        Ok(records)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn put(&self, record: Record) -> impl Future<Output = Result<()>> + Send {
        ready(self.insert(record))
    }

    fn scan(
        &self,
        field: &str,
        range: &KeyRange,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send {
        ready(self.range(field, range))
    }

    fn len(&self) -> Option<usize> {
        Some(self.inner.read().records.len())
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            record_count: self.inner.read().records.len(),
            scans_served: self.scans.load(Ordering::Relaxed),
            records_returned: self.returned.load(Ordering::Relaxed),
        }
    }
}
