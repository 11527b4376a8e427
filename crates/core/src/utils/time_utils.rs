use chrono::{NaiveDate, Utc};

use crate::constants::DATE_FORMAT;
use crate::errors::{Error, Result};

/// Calendar date of "now" used for default ranges and bank sync windows.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses a `YYYY-MM-DD` date supplied by an API caller.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::invalid(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Every calendar day from `start` to `end`, both inclusive.
pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|day| *day <= end).collect()
}
