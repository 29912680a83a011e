//! Billing periods and civil-time helpers.
//!
//! A period is one calendar month in the club's civil timezone, keyed by
//! its first day. Day-of-month computations always go through the civil
//! offset so that billing boundaries match what members see on their own
//! calendars.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One calendar month of billing, normalized to the first day of the
/// month.
///
/// `Period::containing` is the only way the engine constructs one, so the
/// first-of-month invariant holds for every period it produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Period(NaiveDate);

impl Period {
    /// The period covering the given civil date.
    pub fn containing(date: NaiveDate) -> Period {
        // with_day(1) cannot fail: every month has a day 1.
        Period(date.with_day(1).unwrap())
    }

    /// First calendar day of the period.
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Returns true if the given civil date falls inside this period.
    pub fn contains(self, date: NaiveDate) -> bool {
        self.0.year() == date.year() && self.0.month() == date.month()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.0.year(), self.0.month())
    }
}

/// The civil calendar date for a UTC instant under the club's offset.
pub fn civil_date(now_utc: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now_utc.with_timezone(&offset).date_naive()
}

/// The civil day-of-month (1-based) for a UTC instant.
pub fn civil_day_of_month(now_utc: DateTime<Utc>, offset: FixedOffset) -> u32 {
    civil_date(now_utc, offset).day()
}
