//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for creating indexes over the
//! in-memory store or any other [`RecordStore`].

use crate::compute::estimate::EstimateStrategy;
use crate::config::Config;
use crate::error::Result;
use crate::index::QuadIndex;
use crate::storage::{MemoryStore, RecordStore};
use std::time::Duration;

/// Builder for index configuration with estimation and fan-out settings.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    config: Config,
}

impl IndexBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set how candidate tiles are tested against the query region.
    pub fn strategy(mut self, strategy: EstimateStrategy) -> Self {
        self.config = self.config.with_strategy(strategy);
        self
    }

    /// Set the per-scan timeout; `None` disables it.
    pub fn scan_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config = self.config.with_scan_timeout(timeout);
        self
    }

    pub fn max_concurrent_scans(mut self, max_scans: usize) -> Self {
        self.config = self.config.with_max_concurrent_scans(max_scans);
        self
    }

    pub fn max_candidate_tiles(mut self, max_tiles: usize) -> Self {
        self.config = self.config.with_max_candidate_tiles(max_tiles);
        self
    }

    /// Set the store field the quadkeys are indexed under.
    pub fn index_field(mut self, field: impl Into<String>) -> Self {
        self.config = self.config.with_index_field(field);
        self
    }

    /// Build an index over `store`. Fails if the configuration is invalid.
    pub fn build_with<S: RecordStore>(self, store: S) -> Result<QuadIndex<S>> {
        QuadIndex::new(store, self.config)
    }

    /// Build an index over a fresh in-memory store indexing the configured
    /// field.
    pub fn build(self) -> Result<QuadIndex<MemoryStore>> {
        let store = MemoryStore::with_field(self.config.index_field.clone());
        self.build_with(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuadscanError;
    use crate::storage::RecordStore;
    use geo::Point;
    use serde_json::json;

    #[test]
    fn test_builder_default() {
        let index = IndexBuilder::new().build().unwrap();
        assert_eq!(index.config(), &Config::default());
    }

    #[test]
    fn test_builder_with_settings() {
        let index = IndexBuilder::new()
            .strategy(EstimateStrategy::ExactIntersection)
            .scan_timeout(Some(Duration::from_millis(500)))
            .max_concurrent_scans(4)
            .max_candidate_tiles(64)
            .build()
            .unwrap();

        let config = index.config();
        assert_eq!(config.strategy, EstimateStrategy::ExactIntersection);
        assert_eq!(config.scan_timeout(), Some(Duration::from_millis(500)));
        assert_eq!(config.max_concurrent_scans, 4);
        assert_eq!(config.max_candidate_tiles, 64);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = Config::default();
        config.index_field.clear();
        let result = IndexBuilder::new().config(config).build();
        assert!(matches!(result, Err(QuadscanError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_builder_custom_field_reaches_store() {
        let index = IndexBuilder::new().index_field("geo_qk").build().unwrap();
        assert_eq!(index.store().field(), "geo_qk");

        index
            .insert(Point::new(139.752768, 35.685323), json!({}))
            .await
            .unwrap();
        assert_eq!(index.store().stats().record_count, 1);
    }
}
