//! Inclusive calendar date ranges used in series request paths.

use crate::FitbitError;
use chrono::{Datelike, Days, NaiveDate};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FitbitError> {
        if start > end {
            return Err(FitbitError::Config(format!(
                "date range starts after it ends: {start} > {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// From the most recent Sunday (inclusive) through `today`.
    pub fn week_to_date(today: NaiveDate) -> Self {
        let since_sunday = u64::from(today.weekday().num_days_from_sunday());
        Self {
            start: today - Days::new(since_sunday),
            end: today,
        }
    }

    /// The `days` calendar days ending on `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Result<Self, FitbitError> {
        if days == 0 {
            return Err(FitbitError::Config(
                "trailing range needs at least one day".into(),
            ));
        }
        let start = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| FitbitError::Config(format!("{days} days before {today} is out of range")))?;
        Ok(Self { start, end: today })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Renders as `YYYY-MM-DD/YYYY-MM-DD`, the form used in request paths.
impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
