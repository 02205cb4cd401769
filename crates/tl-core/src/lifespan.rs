//! A ready-made time-tracked entity.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::end_time::{DISPLAY_FORMAT, EndTime};
use crate::tracked::TimeTracked;

/// Errors raised when building or ending a [`Lifespan`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifespanError {
    /// The requested end lies before the start.
    #[error("lifespan cannot end at {until} before it starts at {from}")]
    EndsBeforeStart {
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    },

    /// The lifespan already has a concrete end.
    #[error("lifespan already ended at {until}")]
    AlreadyEnded { until: DateTime<Utc> },
}

/// A labelled existence interval `[existent_from, valid_until)`.
///
/// The end can only move from open to a concrete time, once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLifespan")]
pub struct Lifespan {
    label: String,
    existent_from: DateTime<Utc>,
    valid_until: EndTime,
}

/// Unvalidated wire form of [`Lifespan`].
#[derive(Deserialize)]
struct RawLifespan {
    label: String,
    existent_from: DateTime<Utc>,
    #[serde(default = "open_end")]
    valid_until: EndTime,
}

const fn open_end() -> EndTime {
    EndTime::Open
}

impl TryFrom<RawLifespan> for Lifespan {
    type Error = LifespanError;

    fn try_from(raw: RawLifespan) -> Result<Self, Self::Error> {
        match raw.valid_until {
            EndTime::At(until) => Self::closed(raw.label, raw.existent_from, until),
            EndTime::Open => Ok(Self::open(raw.label, raw.existent_from)),
        }
    }
}

impl Lifespan {
    /// Creates a lifespan that has not ended yet.
    pub fn open(label: impl Into<String>, existent_from: DateTime<Utc>) -> Self {
        Self {
            label: label.into(),
            existent_from,
            valid_until: EndTime::Open,
        }
    }

    /// Creates a lifespan that already ended at `until`.
    pub fn closed(
        label: impl Into<String>,
        existent_from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Self, LifespanError> {
        let mut lifespan = Self::open(label, existent_from);
        lifespan.end(until)?;
        Ok(lifespan)
    }

    /// Ends the lifespan at `at`.
    ///
    /// Fails if it has already ended or if `at` precedes the start.
    pub fn end(&mut self, at: DateTime<Utc>) -> Result<(), LifespanError> {
        if let EndTime::At(until) = self.valid_until {
            return Err(LifespanError::AlreadyEnded { until });
        }
        if at < self.existent_from {
            return Err(LifespanError::EndsBeforeStart {
                from: self.existent_from,
                until: at,
            });
        }
        self.valid_until = EndTime::At(at);
        Ok(())
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Duration from the start up to the end, or up to `now` while open.
    #[must_use]
    pub fn active_duration_at(&self, now: DateTime<Utc>) -> Duration {
        self.valid_until.as_datetime().unwrap_or(now) - self.existent_from
    }
}

impl TimeTracked for Lifespan {
    fn existent_from(&self) -> DateTime<Utc> {
        self.existent_from
    }

    fn valid_until(&self) -> EndTime {
        self.valid_until
    }

    fn is_existent_at(&self, pit: DateTime<Utc>) -> bool {
        self.existent_from <= pit && self.valid_until.is_after(pit)
    }

    fn active_duration(&self) -> Duration {
        self.active_duration_at(Utc::now())
    }
}

impl fmt::Display for Lifespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} -- {}]",
            self.label,
            self.existent_from.format(DISPLAY_FORMAT),
            self.valid_until
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 2, 15, 30, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    #[test]
    fn closed_lifespan_exists_within_half_open_interval() {
        let lifespan = Lifespan::closed("a", ts(0), ts(10)).unwrap();

        assert!(!lifespan.is_existent_at(ts(-1)));
        assert!(lifespan.is_existent_at(ts(0)));
        assert!(lifespan.is_existent_at(ts(9)));
        assert!(!lifespan.is_existent_at(ts(10)));
        assert!(!lifespan.is_existent_at(ts(11)));
    }

    #[test]
    fn open_lifespan_exists_from_start_onwards() {
        let lifespan = Lifespan::open("a", ts(0));

        assert!(!lifespan.is_existent_at(ts(-1)));
        assert!(lifespan.is_existent_at(ts(0)));
        assert!(lifespan.is_existent_at(ts(1_000_000)));
    }

    #[test]
    fn existence_matches_formula_around_boundaries() {
        let lifespans = [
            Lifespan::closed("a", ts(0), ts(10)).unwrap(),
            Lifespan::closed("empty", ts(5), ts(5)).unwrap(),
            Lifespan::open("b", ts(3)),
        ];
        for lifespan in &lifespans {
            let start = lifespan.existent_from();
            let mut pits = vec![start - Duration::seconds(1), start, start + Duration::seconds(1)];
            if let Some(until) = lifespan.valid_until().as_datetime() {
                pits.extend([until - Duration::seconds(1), until, until + Duration::seconds(1)]);
            }
            for pit in pits {
                let expected = lifespan.existent_from() <= pit
                    && (lifespan.valid_until().is_open()
                        || lifespan.valid_until() > EndTime::At(pit));
                assert_eq!(lifespan.is_existent_at(pit), expected, "{lifespan} at {pit}");
            }
        }
    }

    #[test]
    fn end_is_one_way() {
        let mut lifespan = Lifespan::open("a", ts(0));
        lifespan.end(ts(5)).unwrap();
        assert_eq!(lifespan.valid_until(), EndTime::At(ts(5)));

        let err = lifespan.end(ts(6)).unwrap_err();
        assert_eq!(err, LifespanError::AlreadyEnded { until: ts(5) });
        assert_eq!(lifespan.valid_until(), EndTime::At(ts(5)));
    }

    #[test]
    fn end_rejects_time_before_start() {
        let mut lifespan = Lifespan::open("a", ts(0));
        let err = lifespan.end(ts(-1)).unwrap_err();
        assert_eq!(
            err,
            LifespanError::EndsBeforeStart {
                from: ts(0),
                until: ts(-1),
            }
        );
        assert!(lifespan.valid_until().is_open());
        assert!(Lifespan::closed("b", ts(0), ts(-1)).is_err());
    }

    #[test]
    fn active_duration_uses_end_or_now() {
        let closed = Lifespan::closed("a", ts(0), ts(30)).unwrap();
        assert_eq!(closed.active_duration_at(ts(100)), Duration::minutes(30));
        assert_eq!(closed.active_duration(), Duration::minutes(30));

        let open = Lifespan::open("b", ts(0));
        assert_eq!(open.active_duration_at(ts(45)), Duration::minutes(45));
        assert!(open.active_duration() > Duration::zero());
    }

    #[test]
    fn display_shows_label_and_bounds() {
        let closed = Lifespan::closed("a", ts(0), ts(60)).unwrap();
        assert_eq!(
            closed.to_string(),
            "a [2020-01-02 15:30:00 -- 2020-01-02 16:30:00]"
        );
        let open = Lifespan::open("b", ts(0));
        assert_eq!(open.to_string(), "b [2020-01-02 15:30:00 -- open]");
        assert_eq!(open.label(), "b");
    }

    #[test]
    fn serde_roundtrip() {
        let lifespan = Lifespan::closed("a", ts(0), ts(60)).unwrap();
        let json = serde_json::to_string(&lifespan).unwrap();
        let parsed: Lifespan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lifespan);
    }

    #[test]
    fn serde_defaults_missing_end_to_open() {
        let json = r#"{"label": "a", "existent_from": "2020-01-02T15:30:00Z"}"#;
        let parsed: Lifespan = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, Lifespan::open("a", ts(0)));
    }

    #[test]
    fn serde_rejects_end_before_start() {
        let json = r#"{
            "label": "a",
            "existent_from": "2020-01-02T15:30:00Z",
            "valid_until": "2020-01-02T15:00:00Z"
        }"#;
        let result: Result<Lifespan, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
