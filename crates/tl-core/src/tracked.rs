//! The capability every stored entity provides.

use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::end_time::EndTime;

/// An entity with a time dimension.
///
/// It comes into existence at some point in time and may stop existing at a
/// later one. An entity that has stopped never becomes existent again: once
/// [`valid_until`](Self::valid_until) returns a concrete time it must never
/// go back to [`EndTime::Open`].
///
/// Implementations must keep [`is_existent_at`](Self::is_existent_at)
/// equivalent to `existent_from() <= pit && valid_until().is_after(pit)`.
pub trait TimeTracked {
    /// When this entity started to exist. Always defined and never changes.
    fn existent_from(&self) -> DateTime<Utc>;

    /// When this entity stopped existing (exclusive), or `Open` if it still does.
    fn valid_until(&self) -> EndTime;

    /// Returns true if the entity exists at `pit`.
    fn is_existent_at(&self, pit: DateTime<Utc>) -> bool;

    /// How long the entity has existed, measured up to now while still open.
    fn active_duration(&self) -> Duration;
}

macro_rules! forward_time_tracked {
    ($($ptr:ty),+ $(,)?) => {
        $(
            impl<T: TimeTracked + ?Sized> TimeTracked for $ptr {
                fn existent_from(&self) -> DateTime<Utc> {
                    (**self).existent_from()
                }

                fn valid_until(&self) -> EndTime {
                    (**self).valid_until()
                }

                fn is_existent_at(&self, pit: DateTime<Utc>) -> bool {
                    (**self).is_existent_at(pit)
                }

                fn active_duration(&self) -> Duration {
                    (**self).active_duration()
                }
            }
        )+
    };
}

forward_time_tracked!(&T, Box<T>, Rc<T>, Arc<T>);
