//! Compute layer for query processing and algorithms.
//!
//! This module separates the spatial math from storage concerns:
//! - Quadkey encoding and tile projection
//! - Query regions and coordinate validation
//! - Tile estimation for a region
//! - Prefix range keys for ordered scans
//!
//! Everything here is pure and independent of any store.

pub mod estimate;
pub mod quadkey;
pub mod range;
pub mod region;
pub mod validation;
