//! Storage abstraction for quadscan
//!
//! The index never interprets geometry inside the store. All it needs is an
//! ordered string field holding each record's quadkey and a way to scan a
//! range of it, which is what [`RecordStore`] describes.

use crate::compute::range::KeyRange;
use crate::error::Result;
use quadscan_types::Record;
use std::future::Future;

mod memory;

pub use memory::MemoryStore;

/// Field name under which records' quadkeys are indexed by default.
pub const DEFAULT_INDEX_FIELD: &str = "quadkey20";

/// Trait for ordered record stores
///
/// Implementations talk to whatever key-value store holds the records. The
/// index calls `scan` once per candidate tile, concurrently, so scans must be
/// safe to run in parallel.
pub trait RecordStore: Send + Sync + 'static {
    /// Persist a new record. Records are written once and never moved.
    fn put(&self, record: Record) -> impl Future<Output = Result<()>> + Send;

    /// All records whose `field` value lies in `range`, sorted by that field.
    fn scan(
        &self,
        field: &str,
        range: &KeyRange,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Number of records held, when the store can tell cheaply.
    fn len(&self) -> Option<usize> {
        None
    }

    /// Store statistics
    fn stats(&self) -> StoreStats {
        StoreStats::default()
    }
}

/// Store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of records
    pub record_count: usize,
    /// Number of range scans served
    pub scans_served: u64,
    /// Records returned across all scans
    pub records_returned: u64,
}
