//! Date resolution for point and range queries.
//!
//! All stored and queried timestamps share one canonical layout,
//! `MM/DD/YYYY, HH:MM:SS` with a 24-hour clock. Point queries match a stored
//! timestamp by its `MM/DD/YYYY` prefix, range queries compare against a
//! canonical lower bound.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use thiserror::Error;

const CANONICAL_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";
const SLOT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("period of {0} reaches outside the supported calendar")]
    OutOfRange(Period),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Days,
    Weeks,
    Months,
}

impl PeriodUnit {
    const fn noun(self, amount: u32) -> &'static str {
        match (self, amount) {
            (Self::Days, 1) => "day",
            (Self::Days, _) => "days",
            (Self::Weeks, 1) => "week",
            (Self::Weeks, _) => "weeks",
            (Self::Months, 1) => "month",
            (Self::Months, _) => "months",
        }
    }
}

/// A relative look-back window such as "3 days".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub amount: u32,
    pub unit: PeriodUnit,
}

impl Period {
    #[must_use]
    pub const fn new(amount: u32, unit: PeriodUnit) -> Self {
        Self { amount, unit }
    }

    /// Pick the period from the three mutually exclusive slots.
    ///
    /// The first one set wins, in the order days, weeks, months. The others
    /// are ignored. `Some(0)` counts as set.
    #[must_use]
    pub fn select(days: Option<u32>, weeks: Option<u32>, months: Option<u32>) -> Option<Self> {
        days.map(|n| Self::new(n, PeriodUnit::Days))
            .or_else(|| weeks.map(|n| Self::new(n, PeriodUnit::Weeks)))
            .or_else(|| months.map(|n| Self::new(n, PeriodUnit::Months)))
    }

    /// Move `now` back by this period.
    ///
    /// Weeks are seven days. Months follow the calendar and clamp to the
    /// last valid day, so March 31st minus one month is February 28th/29th.
    pub fn subtract_from(self, now: NaiveDateTime) -> Result<NaiveDateTime, DateError> {
        let lower = match self.unit {
            PeriodUnit::Days => TimeDelta::try_days(i64::from(self.amount))
                .and_then(|delta| now.checked_sub_signed(delta)),
            PeriodUnit::Weeks => TimeDelta::try_days(i64::from(self.amount) * 7)
                .and_then(|delta| now.checked_sub_signed(delta)),
            PeriodUnit::Months => now.checked_sub_months(Months::new(self.amount)),
        };

        lower.ok_or(DateError::OutOfRange(self))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.noun(self.amount))
    }
}

/// A date predicate, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateQuery {
    /// Events whose timestamp begins with `prefix` (`MM/DD/YYYY`).
    Point { prefix: String },
    /// Events whose timestamp sorts after `lower_bound`.
    Range { lower_bound: String, period: Period },
}

impl DateQuery {
    /// Phrase used in report headers and email subjects, e.g. "on 06/15/2024"
    /// or "for the past 3 days".
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Point { prefix } => format!("on {prefix}"),
            Self::Range { period, .. } => format!("for the past {period}"),
        }
    }
}

/// Resolve a `YYYY-MM-DD` slot value into a point query.
pub fn resolve_point_date(date: &str) -> Result<DateQuery, DateError> {
    let day = NaiveDate::parse_from_str(date.trim(), SLOT_DATE_FORMAT)
        .map_err(|_| DateError::InvalidDate(date.to_string()))?;

    Ok(DateQuery::Point {
        prefix: format_date_prefix(day),
    })
}

/// Resolve a look-back period relative to `now` into a range query.
pub fn resolve_range(period: Period, now: NaiveDateTime) -> Result<DateQuery, DateError> {
    let lower = period.subtract_from(now)?;

    Ok(DateQuery::Range {
        lower_bound: format_canonical(lower),
        period,
    })
}

#[must_use]
pub fn format_date_prefix(day: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", day.month(), day.day(), day.year())
}

/// Render a time value in the canonical `MM/DD/YYYY, HH:MM:SS` layout.
///
/// Every field is taken from the value itself; the hour is always `00`-`23`.
#[must_use]
pub fn format_canonical(dt: NaiveDateTime) -> String {
    format!(
        "{}, {:02}:{:02}:{:02}",
        format_date_prefix(dt.date()),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

#[must_use]
pub fn parse_canonical(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp.trim(), CANONICAL_FORMAT).ok()
}

/// Human-facing rendering of a stored timestamp, e.g. `6/15/2024, 2:05:09 PM`.
///
/// Strings that are not canonical timestamps are passed through untouched.
#[must_use]
pub fn display_timestamp(timestamp: &str) -> String {
    let Some(dt) = parse_canonical(timestamp) else {
        return timestamp.to_string();
    };

    let (pm, hour) = dt.hour12();
    format!(
        "{}/{}/{}, {}:{:02}:{:02} {}",
        dt.month(),
        dt.day(),
        dt.year(),
        hour,
        dt.minute(),
        dt.second(),
        if pm { "PM" } else { "AM" }
    )
}
