//! Inclusive date ranges and their comparison periods.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::time_utils::{get_days_between, parse_date};
use crate::constants::{DEFAULT_PERIOD_DAYS, MAX_PERIOD_DAYS};
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::invalid("Start date must not be after end date"));
        }
        if (end - start).num_days() >= MAX_PERIOD_DAYS {
            return Err(Error::invalid(format!(
                "Date range must not exceed {} days",
                MAX_PERIOD_DAYS
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a period from optional `YYYY-MM-DD` bounds. A missing end is
    /// `today`; a missing start is `today` minus the default lookback.
    pub fn resolve(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Result<Self> {
        let non_empty = |s: &&str| !s.trim().is_empty();
        let start = match from.filter(non_empty) {
            Some(raw) => parse_date(raw)?,
            None => today
                .checked_sub_signed(Duration::days(DEFAULT_PERIOD_DAYS))
                .ok_or_else(|| Error::invalid("Date is out of range"))?,
        };
        let end = match to.filter(non_empty) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };
        Self::new(start, end)
    }

    /// Number of calendar days covered, counting both ends.
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The equal-length period ending the day before `start`. Fails when
    /// that window falls before the earliest representable date.
    pub fn previous(&self) -> Result<Self> {
        let shift = Duration::days(self.length_days());
        let out_of_range = || Error::invalid("Comparison period is out of range");
        Ok(Self {
            start: self.start.checked_sub_signed(shift).ok_or_else(out_of_range)?,
            end: self.end.checked_sub_signed(shift).ok_or_else(out_of_range)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        get_days_between(self.start, self.end)
    }
}
