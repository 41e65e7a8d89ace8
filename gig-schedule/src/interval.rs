use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, TimeOfDay};

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Minutes past the whole hour from which the started hour is billed.
const ROUND_UP_MINUTES: u32 = 45;

/// A scheduled occupation between two wall-clock times.
///
/// An `end` at or before `start` means the interval runs past midnight
/// into the following day, so every interval lasts between one minute
/// and 24 hours. Equal times are a full day, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// An [`Interval`] pinned to real date-times. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, Error> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    pub fn crosses_midnight(self) -> bool {
        self.end <= self.start
    }

    /// Pins the interval to `date`, moving the end to the next day when
    /// the interval crosses midnight. Fails with [`Error::DateOutOfRange`]
    /// when that next day does not exist.
    pub fn on(self, date: NaiveDate) -> Result<Span, Error> {
        let start = date.and_time(self.start.into());
        let end_date = if self.crosses_midnight() {
            date.succ_opt().ok_or(Error::DateOutOfRange(date))?
        } else {
            date
        };

        Ok(Span {
            start,
            end: end_date.and_time(self.end.into()),
        })
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }

    /// Whole hours to bill: a remainder of 45 minutes or more rounds up,
    /// anything less is dropped, and the result is never below one hour.
    pub fn billable_hours(self) -> u32 {
        let minutes = self.minutes();
        let hours = minutes / MINUTES_PER_HOUR;

        if minutes % MINUTES_PER_HOUR >= ROUND_UP_MINUTES {
            hours + 1
        } else {
            hours.max(1)
        }
    }

    /// Whether the two intervals share any time, boundaries excluded.
    ///
    /// Without dates there is no telling on which day an interval starts,
    /// so the other interval is compared on the same day, a day earlier
    /// and a day later: `22:00-02:00` overlaps `01:00-03:00`. Intervals
    /// that stay within one day never meet a shifted copy.
    pub fn overlaps(self, other: Interval) -> bool {
        let (start, end) = self.minute_bounds();
        let (other_start, other_end) = other.minute_bounds();
        let day = i64::from(MINUTES_PER_DAY);

        [-day, 0, day]
            .into_iter()
            .any(|shift| start < other_end + shift && end > other_start + shift)
    }

    /// Start and end as minutes past the start of the starting day.
    fn minute_bounds(self) -> (i64, i64) {
        let start = i64::from(minute_of_day(self.start));
        (start, start + i64::from(self.minutes()))
    }

    fn minutes(self) -> u32 {
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);

        if self.crosses_midnight() {
            end + MINUTES_PER_DAY - start
        } else {
            end - start
        }
    }
}

fn minute_of_day(time: TimeOfDay) -> u32 {
    time.hour() * MINUTES_PER_HOUR + time.minute()
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl Span {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap: a span ending exactly when the other starts does
    /// not overlap it.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Billable hours between two `HH:MM` times, see [`Interval::billable_hours`].
pub fn compute_duration_hours(start: &str, end: &str) -> Result<u32, Error> {
    Interval::parse(start, end).map(Interval::billable_hours)
}

/// Whether two `HH:MM` intervals overlap, see [`Interval::overlaps`].
pub fn intervals_overlap(
    start1: &str,
    end1: &str,
    start2: &str,
    end2: &str,
) -> Result<bool, Error> {
    let first = Interval::parse(start1, end1)?;
    let second = Interval::parse(start2, end2)?;

    Ok(first.overlaps(second))
}
