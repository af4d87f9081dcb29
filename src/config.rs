//! Index configuration
//!
//! Settings for tile estimation and the concurrent scan fan-out. Configs can
//! be built in code, or loaded from JSON (and TOML with the `toml` feature).
use crate::compute::estimate::{DEFAULT_MAX_CANDIDATE_TILES, EstimateStrategy};
use crate::storage::DEFAULT_INDEX_FIELD;
use serde::de::Error;
use std::time::Duration;

/// Index configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Store field holding each record's quadkey
    #[serde(default = "Config::default_index_field")]
    pub index_field: String,

    #[serde(default)]
    pub strategy: EstimateStrategy,

    /// Largest tile span the estimator will walk
    #[serde(default = "Config::default_max_candidate_tiles")]
    pub max_candidate_tiles: usize,

    /// Upper bound on range scans in flight for one query
    #[serde(default = "Config::default_max_concurrent_scans")]
    pub max_concurrent_scans: usize,

    /// Per-scan timeout in milliseconds; `None` waits forever
    #[serde(default = "Config::default_scan_timeout_ms")]
    pub scan_timeout_ms: Option<u64>,
}

impl Config {
    fn default_index_field() -> String {
        DEFAULT_INDEX_FIELD.to_string()
    }

    const fn default_max_candidate_tiles() -> usize {
        DEFAULT_MAX_CANDIDATE_TILES
    }

    const fn default_max_concurrent_scans() -> usize {
        32
    }

    const fn default_scan_timeout_ms() -> Option<u64> {
        Some(10_000)
    }

    pub fn with_index_field(mut self, field: impl Into<String>) -> Self {
        self.index_field = field.into();
        self
    }

    pub fn with_strategy(mut self, strategy: EstimateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_candidate_tiles(mut self, max_tiles: usize) -> Self {
        assert!(max_tiles > 0, "Candidate tile limit must be greater than zero");
        self.max_candidate_tiles = max_tiles;
        self
    }

    pub fn with_max_concurrent_scans(mut self, max_scans: usize) -> Self {
        assert!(max_scans > 0, "Concurrent scan limit must be greater than zero");

        if max_scans > 1024 {
            log::warn!(
                "Concurrent scan limit of {} is very large; every in-flight scan \
                holds a store connection or request slot.",
                max_scans
            );
        }

        self.max_concurrent_scans = max_scans;
        self
    }

    pub fn with_scan_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scan_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.index_field.is_empty() {
            return Err("Index field must not be empty".to_string());
        }

        if self.max_candidate_tiles == 0 {
            return Err("Candidate tile limit must be greater than zero".to_string());
        }

        if self.max_concurrent_scans == 0 {
            return Err("Concurrent scan limit must be greater than zero".to_string());
        }

        if self.scan_timeout_ms == Some(0) {
            return Err("Scan timeout must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_field: Self::default_index_field(),
            strategy: EstimateStrategy::default(),
            max_candidate_tiles: Self::default_max_candidate_tiles(),
            max_concurrent_scans: Self::default_max_concurrent_scans(),
            scan_timeout_ms: Self::default_scan_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.index_field, "quadkey20");
        assert_eq!(config.strategy, EstimateStrategy::CornerHeuristic);
        assert_eq!(config.max_concurrent_scans, 32);
        assert_eq!(config.scan_timeout(), Some(Duration::from_secs(10)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_strategy(EstimateStrategy::ExactIntersection)
            .with_max_concurrent_scans(8)
            .with_scan_timeout(None);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
        assert!(deserialized.scan_timeout().is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{ "strategy": "exact_intersection" }"#).unwrap();
        assert_eq!(config.strategy, EstimateStrategy::ExactIntersection);
        assert_eq!(config.max_candidate_tiles, DEFAULT_MAX_CANDIDATE_TILES);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(Config::from_json(r#"{ "zoom": 17 }"#).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_json(r#"{ "max_concurrent_scans": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "scan_timeout_ms": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "index_field": "" }"#).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml() {
        let config = Config::from_toml("index_field = \"qk\"\nscan_timeout_ms = 250\n").unwrap();
        assert_eq!(config.index_field, "qk");
        assert_eq!(config.scan_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(Config::from_toml(&config.to_toml().unwrap()).unwrap(), config);
    }
}
