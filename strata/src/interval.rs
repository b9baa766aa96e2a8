//! Fixed time intervals for date-histogram queries.
//!
//! Intervals are written the way the backend writes them: a positive
//! integer followed by a unit suffix (`ms`, `s`, `m`, `h`, `d`).
//! Calendar units (months, years) are not fixed-length and are not
//! accepted here; pre-aggregated backends only advertise fixed intervals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Unit of a fixed time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl IntervalUnit {
    fn as_millis(self) -> u64 {
        match self {
            IntervalUnit::Millisecond => 1,
            IntervalUnit::Second => 1_000,
            IntervalUnit::Minute => 60_000,
            IntervalUnit::Hour => 3_600_000,
            IntervalUnit::Day => 86_400_000,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            IntervalUnit::Millisecond => "ms",
            IntervalUnit::Second => "s",
            IntervalUnit::Minute => "m",
            IntervalUnit::Hour => "h",
            IntervalUnit::Day => "d",
        }
    }
}

/// A fixed-length time interval such as `30s` or `1h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeInterval {
    value: u64,
    unit: IntervalUnit,
}

impl TimeInterval {
    pub fn new(value: u64, unit: IntervalUnit) -> Self {
        Self { value, unit }
    }

    /// Length of the interval in milliseconds. Interval comparisons and
    /// multiple-of checks all happen in this unit.
    pub fn as_millis(&self) -> u64 {
        self.value * self.unit.as_millis()
    }

    /// True when `self` is an exact integer multiple of `other`.
    pub fn is_multiple_of(&self, other: &TimeInterval) -> bool {
        other.as_millis() > 0 && self.as_millis() % other.as_millis() == 0
    }
}

impl FromStr for TimeInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, suffix) = s.split_at(digits_end);

        let value: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidInterval(s.to_string()))?;
        if value == 0 {
            return Err(Error::InvalidInterval(s.to_string()));
        }

        let unit = match suffix {
            "ms" => IntervalUnit::Millisecond,
            "s" => IntervalUnit::Second,
            "m" => IntervalUnit::Minute,
            "h" => IntervalUnit::Hour,
            "d" => IntervalUnit::Day,
            _ => return Err(Error::InvalidInterval(s.to_string())),
        };

        Ok(TimeInterval { value, unit })
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl TryFrom<String> for TimeInterval {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeInterval> for String {
    fn from(interval: TimeInterval) -> Self {
        interval.to_string()
    }
}
