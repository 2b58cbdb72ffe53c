//! Query time windows
//!
//! Every statistics request covers `[now - range, now - delay]`. The window is
//! computed once per scrape and rendered in the precision each endpoint
//! expects: bandwidth takes full timestamps, the log analysis endpoints only
//! take days.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Local};
use serde::{Deserialize, Serialize};

use crate::constants::window::{DATETIME_FORMAT, DATE_FORMAT};
use crate::error::{Error, Result};

/// Sample density requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "1day")]
    OneDay,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::FiveMinutes => "5min",
            Granularity::OneHour => "1hour",
            Granularity::OneDay => "1day",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "5min" => Ok(Granularity::FiveMinutes),
            "1hour" => Ok(Granularity::OneHour),
            "1day" => Ok(Granularity::OneDay),
            other => Err(Error::Config(format!(
                "unknown granularity `{other}`, expected one of 5min, 1hour, 1day"
            ))),
        }
    }
}

/// Precision of the `startDate`/`endDate` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    /// `YYYY-MM-DD HH:MM:SS`
    Seconds,
    /// `YYYY-MM-DD`
    Day,
}

impl DatePrecision {
    fn pattern(&self) -> &'static str {
        match self {
            DatePrecision::Seconds => DATETIME_FORMAT,
            DatePrecision::Day => DATE_FORMAT,
        }
    }
}

/// Source of "now" for window computation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Builds `[now - range_secs, now - delay_secs]`.
    ///
    /// Fails with [`Error::InvalidWindow`] unless `range_secs > delay_secs`
    /// and both offsets stay within the representable date range.
    pub fn ending_at(now: DateTime<FixedOffset>, range_secs: i64, delay_secs: i64) -> Result<Self> {
        let invalid = || Error::InvalidWindow {
            range_secs,
            delay_secs,
        };

        if range_secs <= delay_secs {
            return Err(invalid());
        }

        let before_now = |secs: i64| {
            Duration::try_seconds(secs).and_then(|offset| now.checked_sub_signed(offset))
        };

        Ok(Self {
            start: before_now(range_secs).ok_or_else(invalid)?,
            end: before_now(delay_secs).ok_or_else(invalid)?,
        })
    }

    pub fn from_clock(clock: &dyn Clock, range_secs: i64, delay_secs: i64) -> Result<Self> {
        Self::ending_at(clock.now(), range_secs, delay_secs)
    }

    /// Returns `(startDate, endDate)` rendered with the given precision
    pub fn format(&self, precision: DatePrecision) -> (String, String) {
        let pattern = precision.pattern();
        (
            self.start.format(pattern).to_string(),
            self.end.format(pattern).to_string(),
        )
    }
}
