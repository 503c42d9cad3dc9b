//! Ledger time
//!
//! Two distinct notions of time flow through the system: wall-clock
//! seconds ([`Timestamp`]) drive the governance delay, and ordered
//! ledger positions ([`BlockPoint`]) label state snapshots.

use std::fmt::{self, Display, Formatter};

/// A point in time, seconds since the Unix epoch
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from seconds since the Unix epoch
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the Unix epoch
    #[inline]
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Timestamp advanced by the given number of seconds, saturating
    #[inline]
    #[must_use]
    pub const fn saturating_add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since `earlier`, or None if `earlier` is in the future
    #[inline]
    #[must_use]
    pub fn secs_since(&self, earlier: Timestamp) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }

    /// Whether this timestamp is at or after `other`
    #[inline]
    #[must_use]
    pub const fn is_at_or_after(&self, other: Timestamp) -> bool {
        self.0 >= other.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// An ordered position in ledger history
///
/// Snapshots are labelled with the point at which they were taken so
/// that before/after comparisons are unambiguous. Points are totally
/// ordered but carry no wall-clock meaning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct BlockPoint(u64);

impl BlockPoint {
    /// Create a new block point
    #[inline]
    #[must_use]
    pub const fn new(point: u64) -> Self {
        Self(point)
    }

    /// The raw point value
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The next point in history
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Display for BlockPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockPoint {
    fn from(point: u64) -> Self {
        Self(point)
    }
}
