//! Concurrent range-scan fan-out.
//!
//! One task per candidate tile scans that tile's key range. Each task hands
//! its records back through the task set, so merging happens on the calling
//! task alone and needs no lock. The first failure aborts the rest and
//! becomes the result; a partial answer is never returned.

use crate::compute::range::KeyRange;
use crate::compute::region::QueryRegion;
use crate::error::{QuadscanError, Result};
use crate::storage::RecordStore;
use quadscan_types::{Record, Tile};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Knobs for one fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub index_field: Arc<str>,
    pub scan_timeout: Option<Duration>,
    pub max_concurrent_scans: usize,
}

/// Statistics about a query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Number of tile ranges scanned
    pub tiles_scanned: usize,

    /// Records returned by the store across all scans
    pub candidates_examined: usize,

    /// Records seen again from another tile's scan
    pub duplicates_dropped: usize,

    /// Records inside a scanned tile but outside the region
    pub outside_region: usize,

    /// Number of results returned (after filtering)
    pub results_returned: usize,
}

/// Merged and filtered records of one fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Ordered by quadkey, then id
    pub records: Vec<Record>,
    pub stats: QueryStats,
}

/// Scan every tile's range concurrently, then merge, deduplicate and filter
/// against the region.
pub async fn fetch<S: RecordStore>(
    store: &Arc<S>,
    tiles: &[Tile],
    region: &QueryRegion,
    options: &FetchOptions,
) -> Result<FetchOutcome> {
    let limiter = Arc::new(Semaphore::new(options.max_concurrent_scans.max(1)));
    let mut scans = JoinSet::new();

    for tile in tiles {
        let range = KeyRange::for_tile(tile)?;
        let store = Arc::clone(store);
        let field = Arc::clone(&options.index_field);
        let limiter = Arc::clone(&limiter);
        let timeout = options.scan_timeout;

        scans.spawn(async move {
            let _permit = limiter
                .acquire_owned()
                .await
                .map_err(|e| scan_failure(&range, e))?;

            let scan = store.scan(&field, &range);
            let records = match timeout {
                Some(limit) => tokio::time::timeout(limit, scan)
                    .await
                    .map_err(|_| scan_failure(&range, format!("timed out after {:?}", limit)))?,
                None => scan.await,
            }
            .map_err(|e| scan_failure(&range, e))?;

            Ok::<_, QuadscanError>(records)
        });
    }

    log::debug!("Scanning {} tile ranges", tiles.len());

    let mut stats = QueryStats {
        tiles_scanned: tiles.len(),
        ..QueryStats::default()
    };
    let mut merged: FxHashMap<String, Record> = FxHashMap::default();

    while let Some(joined) = scans.join_next().await {
        let records = match joined {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                scans.abort_all();
                log::warn!("Aborting query: {}", e);
                return Err(e);
            }
            Err(e) => {
                scans.abort_all();
                log::warn!("Aborting query, scan task died: {}", e);
                return Err(QuadscanError::ScanFailure {
                    lower: String::new(),
                    reason: e.to_string(),
                });
            }
        };

        stats.candidates_examined += records.len();
        for record in records {
            if merged.contains_key(record.id()) {
                stats.duplicates_dropped += 1;
                continue;
            }
            merged.insert(record.id().to_string(), record);
        }
    }

    let mut records: Vec<Record> = merged
        .into_values()
        .filter(|record| region.contains_point(&record.point()))
        .collect();
    records.sort_by(|a, b| {
        a.quadkey()
            .cmp(b.quadkey())
            .then_with(|| a.id().cmp(b.id()))
    });

    stats.results_returned = records.len();
    stats.outside_region = stats.candidates_examined - stats.duplicates_dropped - records.len();

    log::debug!(
        "Fetched {} records from {} candidates ({} duplicates, {} outside region)",
        stats.results_returned,
        stats.candidates_examined,
        stats.duplicates_dropped,
        stats.outside_region
    );

    Ok(FetchOutcome { records, stats })
}

fn scan_failure(range: &KeyRange, reason: impl ToString) -> QuadscanError {
    QuadscanError::ScanFailure {
        lower: range.lower().to_string(),
        reason: reason.to_string(),
    }
}
