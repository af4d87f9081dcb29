//! Error types for quadscan.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuadscanError>;

/// Every failure the index can report.
///
/// None of these are retried internally. A query either returns its complete
/// answer or one of these errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadscanError {
    /// A point is outside the projection's domain or not finite.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The query ring is open, degenerate or self-intersecting.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// A zoom level or key prefix is deeper than the index supports.
    #[error("Depth {depth} exceeds maximum depth {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("Invalid quadkey '{0}'")]
    InvalidQuadkey(String),

    /// The region spans more candidate tiles than the configured limit.
    #[error("Region spans {candidates} candidate tiles, limit is {limit}")]
    TooManyTiles { candidates: u64, limit: usize },

    /// A range scan failed, timed out, or its task died.
    #[error("Scan of range starting at '{lower}' failed: {reason}")]
    ScanFailure { lower: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised by store implementations.
    #[error("Storage error: {0}")]
    Storage(String),
}
