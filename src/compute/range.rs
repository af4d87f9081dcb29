//! Prefix range keys.
//!
//! Every record whose key starts with a tile's quadkey sorts inside
//! `[prefix000…, successor(prefix)000…)`, which turns "all records under this
//! tile" into one ordered range scan.

use crate::compute::quadkey::{INDEX_KEY_LEN, to_quadkey};
use crate::error::{QuadscanError, Result};
use quadscan_types::Tile;
use std::ops::Bound;

/// Exclusive end of a [`KeyRange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpperBound {
    Exclusive(String),
    /// The prefix is the last one at its length; the range runs to the end
    /// of the key space.
    Unbounded,
}

/// An inclusive-lower, exclusive-upper range over fixed-length keys.
///
/// # Examples
///
/// ```
/// use quadscan::compute::range::{KeyRange, UpperBound};
///
/// let range = KeyRange::for_prefix("133", 4)?;
/// assert_eq!(range.lower(), "1330");
/// assert_eq!(range.upper(), Some("2000"));
///
/// let last = KeyRange::for_prefix("3333", 4)?;
/// assert_eq!(last.upper_bound(), &UpperBound::Unbounded);
/// # Ok::<(), quadscan::QuadscanError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRange {
    lower: String,
    upper: UpperBound,
}

impl KeyRange {
    /// Range covering every `depth`-digit key that starts with `prefix`.
    pub fn for_prefix(prefix: &str, depth: usize) -> Result<Self> {
        if prefix.len() > depth {
            return Err(QuadscanError::DepthExceeded {
                depth: prefix.len(),
                max: depth,
            });
        }
        if !prefix.bytes().all(|b| (b'0'..=b'3').contains(&b)) {
            return Err(QuadscanError::InvalidQuadkey(prefix.to_string()));
        }

        let lower = pad(prefix, depth);
        let upper = match successor(prefix) {
            Some(next) => UpperBound::Exclusive(pad(&next, depth)),
            None => UpperBound::Unbounded,
        };

        Ok(Self { lower, upper })
    }

    /// Range of index keys under `tile`.
    pub fn for_tile(tile: &Tile) -> Result<Self> {
        Self::for_prefix(&to_quadkey(tile), INDEX_KEY_LEN)
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Exclusive upper bound, `None` when unbounded.
    pub fn upper(&self) -> Option<&str> {
        match &self.upper {
            UpperBound::Exclusive(upper) => Some(upper),
            UpperBound::Unbounded => None,
        }
    }

    pub fn upper_bound(&self) -> &UpperBound {
        &self.upper
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper == UpperBound::Unbounded
    }

    pub fn contains(&self, key: &str) -> bool {
        key >= self.lower.as_str() && self.upper().is_none_or(|upper| key < upper)
    }

    /// The range as a pair of std bounds, for ordered maps.
    pub fn as_bounds(&self) -> (Bound<&str>, Bound<&str>) {
        let upper = match self.upper() {
            Some(upper) => Bound::Excluded(upper),
            None => Bound::Unbounded,
        };
        (Bound::Included(self.lower.as_str()), upper)
    }
}

/// Base-4 increment with carry, at the prefix's own length.
fn successor(prefix: &str) -> Option<String> {
    let mut digits = prefix.as_bytes().to_vec();
    for i in (0..digits.len()).rev() {
        if digits[i] < b'3' {
            digits[i] += 1;
            digits[i + 1..].fill(b'0');
            return Some(digits.into_iter().map(char::from).collect());
        }
    }
    None
}

fn pad(prefix: &str, depth: usize) -> String {
    let mut key = String::with_capacity(depth);
    key.push_str(prefix);
    key.extend(std::iter::repeat_n('0', depth - prefix.len()));
    key
}
