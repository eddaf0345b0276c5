//! Public Holidays
//!
//! Bank and public holidays read from an iCalendar feed.

mod client;
mod ics;

pub use client::{IcsCalendarClient, DEFAULT_CALENDAR_LINK};
pub use ics::parse_holidays;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    /// Midnight UTC at the start of the holiday
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date.format("%Y-%m-%d"), self.name)
    }
}

#[async_trait]
pub trait HolidayCalendar: Send + Sync {
    /// All holidays in the feed, in feed order
    async fn holidays(&self) -> Result<Vec<Holiday>>;
}

/// Time window and count limit applied to a holiday list
///
/// Bounds compare against `Holiday::starts_at`, so a bound later on the
/// same day excludes that day's holiday from `after`.
#[derive(Clone, Debug, Default)]
pub struct HolidayFilter {
    /// Keep holidays starting at or before this instant
    pub before: Option<DateTime<Utc>>,
    /// Keep holidays starting at or after this instant
    pub after: Option<DateTime<Utc>>,
    /// Stop after this many matches; zero means unlimited
    pub max_count: usize,
}

impl HolidayFilter {
    pub fn apply<'a>(&self, holidays: &'a [Holiday]) -> Vec<&'a Holiday> {
        let limit = if self.max_count == 0 {
            usize::MAX
        } else {
            self.max_count
        };

        holidays
            .iter()
            .filter(|h| self.before.is_none_or(|before| h.starts_at() <= before))
            .filter(|h| self.after.is_none_or(|after| h.starts_at() >= after))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn at(m: u32, d: u32, hour: u32) -> DateTime<Utc> {
        day(m, d).and_hms_opt(hour, 0, 0).unwrap().and_utc()
    }

    fn calendar() -> Vec<Holiday> {
        [(1, 1, "New Year"), (4, 18, "Good Friday"), (6, 24, "Sant Joan"), (12, 25, "Christmas")]
            .into_iter()
            .map(|(m, d, name)| Holiday {
                date: day(m, d),
                name: name.into(),
            })
            .collect()
    }

    #[test]
    fn test_filter_window_and_limit() {
        let all = calendar();

        assert_eq!(HolidayFilter::default().apply(&all).len(), 4);

        let window = HolidayFilter {
            after: Some(at(4, 18, 0)),
            before: Some(at(6, 24, 0)),
            max_count: 0,
        };
        let names: Vec<_> = window.apply(&all).iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Good Friday", "Sant Joan"]);

        let first_two_after_feb = HolidayFilter {
            after: Some(at(2, 1, 0)),
            max_count: 2,
            ..Default::default()
        };
        let names: Vec<_> = first_two_after_feb
            .apply(&all)
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(names, vec!["Good Friday", "Sant Joan"]);
    }

    #[test]
    fn test_bounds_compare_at_timestamp_precision() {
        let all = calendar();

        let later_same_day = HolidayFilter {
            after: Some(at(6, 24, 12)),
            ..Default::default()
        };
        let names: Vec<_> = later_same_day.apply(&all).iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Christmas"]);

        let morning_before = HolidayFilter {
            before: Some(at(6, 24, 9)),
            ..Default::default()
        };
        assert_eq!(morning_before.apply(&all).len(), 3);
    }
}
