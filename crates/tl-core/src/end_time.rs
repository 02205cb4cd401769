//! Possibly open-ended timestamps and the orderings built on them.
//!
//! An entity that has not ended yet has an [`EndTime::Open`] end, which sorts
//! after every concrete timestamp. Everything in the interval tree (node keys,
//! the `max` augmentation, overlap pruning) is expressed through this order.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracked::TimeTracked;

/// Display format for concrete timestamps in diagnostics.
pub(crate) const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The end of an entity's existence.
///
/// `Open` means "not ended yet" and compares greater than any concrete time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<DateTime<Utc>>", into = "Option<DateTime<Utc>>")]
pub enum EndTime {
    /// Existence ended at this instant (exclusive).
    At(DateTime<Utc>),
    /// Still existent.
    Open,
}

impl EndTime {
    /// Returns true if no end has been fixed yet.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns the concrete end, if any.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(at) => Some(*at),
            Self::Open => None,
        }
    }

    /// Returns true if this end lies strictly after `pit`.
    ///
    /// An open end is after every point in time.
    #[must_use]
    pub fn is_after(&self, pit: DateTime<Utc>) -> bool {
        match self {
            Self::At(at) => *at > pit,
            Self::Open => true,
        }
    }
}

/// Compares two end times, treating [`EndTime::Open`] as later than any
/// concrete timestamp and equal to itself.
pub fn compare_end_time(a: &EndTime, b: &EndTime) -> Ordering {
    match (a, b) {
        (EndTime::Open, EndTime::Open) => Ordering::Equal,
        (EndTime::Open, EndTime::At(_)) => Ordering::Greater,
        (EndTime::At(_), EndTime::Open) => Ordering::Less,
        (EndTime::At(a), EndTime::At(b)) => a.cmp(b),
    }
}

impl Ord for EndTime {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_end_time(self, other)
    }
}

impl PartialOrd for EndTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<DateTime<Utc>> for EndTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::At(at)
    }
}

impl From<Option<DateTime<Utc>>> for EndTime {
    fn from(at: Option<DateTime<Utc>>) -> Self {
        at.map_or(Self::Open, Self::At)
    }
}

impl From<EndTime> for Option<DateTime<Utc>> {
    fn from(end: EndTime) -> Self {
        end.as_datetime()
    }
}

impl fmt::Display for EndTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(at) => write!(f, "{}", at.format(DISPLAY_FORMAT)),
            Self::Open => f.write_str("open"),
        }
    }
}

/// Orders two entities by start time, then by end time.
///
/// This is the key of the interval tree.
pub fn compare_spans<A, B>(a: &A, b: &B) -> Ordering
where
    A: TimeTracked + ?Sized,
    B: TimeTracked + ?Sized,
{
    a.existent_from()
        .cmp(&b.existent_from())
        .then_with(|| compare_end_time(&a.valid_until(), &b.valid_until()))
}

/// Returns true if the half-open existence intervals of `a` and `b` intersect.
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: TimeTracked + ?Sized,
    B: TimeTracked + ?Sized,
{
    b.valid_until().is_after(a.existent_from()) && a.valid_until().is_after(b.existent_from())
}
