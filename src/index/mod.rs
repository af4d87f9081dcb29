//! The quadkey index: write path and region queries over a [`RecordStore`].

mod fetch;

pub use fetch::{FetchOptions, FetchOutcome, QueryStats, fetch};

use crate::builder::IndexBuilder;
use crate::compute::estimate::TileEstimator;
use crate::compute::quadkey::quadkey_at;
use crate::compute::region::QueryRegion;
use crate::config::Config;
use crate::error::{QuadscanError, Result};
use crate::storage::{MemoryStore, RecordStore};
use geo::Point;
use quadscan_types::{MAX_ZOOM, Record, Tile};
use std::sync::Arc;

/// Result of a region query together with the tiles that were scanned.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Candidate tiles, for drawing the scanned area
    pub tiles: Vec<Tile>,
    pub records: Vec<Record>,
    pub stats: QueryStats,
}

/// Region queries over point records in an ordered store.
///
/// Records are keyed by their quadkey at [`MAX_ZOOM`]. A query picks the
/// tiles covering the region at the requested zoom, scans each tile's key
/// range concurrently, and keeps only the records actually inside the region.
///
/// # Examples
///
/// ```rust
/// use quadscan::{QuadIndex, QueryRegion};
/// use geo::{Point, Rect, coord};
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let index = QuadIndex::memory();
/// index.insert(Point::new(139.752768, 35.685323), json!({ "name": "Kokyo" })).await?;
///
/// let region = QueryRegion::from_rect(Rect::new(
///     coord! { x: 139.733427, y: 35.674296 },
///     coord! { x: 139.764499, y: 35.694091 },
/// ))?;
/// let found = index.query(&region, 17).await?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), quadscan::QuadscanError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct QuadIndex<S: RecordStore = MemoryStore> {
    store: Arc<S>,
    config: Config,
    estimator: TileEstimator,
    fetch_options: FetchOptions,
}

impl QuadIndex<MemoryStore> {
    /// An index over a fresh in-memory store with default settings.
    pub fn memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            config: Config::default(),
            estimator: TileEstimator::default(),
            fetch_options: fetch_options(&Config::default()),
        }
    }

    pub fn builder() -> IndexBuilder {
        IndexBuilder::new()
    }
}

impl<S: RecordStore> QuadIndex<S> {
    /// Wrap `store` using `config`.
    pub fn new(store: S, config: Config) -> Result<Self> {
        Self::from_shared(Arc::new(store), config)
    }

    /// Wrap a store that is shared with other owners.
    pub fn from_shared(store: Arc<S>, config: Config) -> Result<Self> {
        config.validate().map_err(QuadscanError::InvalidConfig)?;

        let estimator =
            TileEstimator::new(config.strategy).with_max_tiles(config.max_candidate_tiles);
        let fetch_options = fetch_options(&config);

        Ok(Self {
            store,
            config,
            estimator,
            fetch_options,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store a new record at `point` under a generated id.
    ///
    /// The record's key is computed at [`MAX_ZOOM`] with the same codec the
    /// query path uses for its ranges.
    pub async fn insert(&self, point: Point, properties: serde_json::Value) -> Result<Record> {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert_with_id(id, point, properties).await
    }

    /// Store a new record under a caller-chosen id.
    pub async fn insert_with_id(
        &self,
        id: impl Into<String>,
        point: Point,
        properties: serde_json::Value,
    ) -> Result<Record> {
        let id = id.into();
        if id.is_empty() {
            return Err(QuadscanError::InvalidInput(
                "Record id must not be empty".to_string(),
            ));
        }

        let quadkey = quadkey_at(&point, MAX_ZOOM)?;
        let record = Record::new(id, point, quadkey, properties);

        self.store.put(record.clone()).await?;
        log::trace!("Indexed record {} at {}", record.id(), record.quadkey());
        Ok(record)
    }

    /// Candidate tiles for `region` at `zoom` under the configured strategy.
    pub fn estimate(&self, region: &QueryRegion, zoom: u8) -> Result<Vec<Tile>> {
        self.estimator.estimate(region, zoom)
    }

    /// All records inside `region`, each once, ordered by quadkey.
    ///
    /// `zoom` sets the tile size used for scanning: coarser zooms mean fewer,
    /// wider scans, finer zooms mean more scans that return fewer records
    /// outside the region.
    pub async fn query(&self, region: &QueryRegion, zoom: u8) -> Result<Vec<Record>> {
        self.query_with_stats(region, zoom)
            .await
            .map(|outcome| outcome.records)
    }

    /// Like [`query`](Self::query), also returning the scanned tiles and
    /// query statistics.
    pub async fn query_with_stats(&self, region: &QueryRegion, zoom: u8) -> Result<QueryOutcome> {
        let tiles = self.estimate(region, zoom)?;
        let FetchOutcome { records, stats } =
            fetch(&self.store, &tiles, region, &self.fetch_options).await?;

        Ok(QueryOutcome {
            tiles,
            records,
            stats,
        })
    }
}

fn fetch_options(config: &Config) -> FetchOptions {
    FetchOptions {
        index_field: Arc::from(config.index_field.as_str()),
        scan_timeout: config.scan_timeout(),
        max_concurrent_scans: config.max_concurrent_scans,
    }
}
