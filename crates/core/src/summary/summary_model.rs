use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw summary parameters as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub account_id: Option<String>,
}

/// Income, expense and net sums of one period, in storage units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub income: i64,
    /// Sum of negative amounts; stays negative.
    pub expenses: i64,
    pub remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub value: i64,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub income: i64,
    /// Absolute value of the day's expenses.
    pub expenses: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub remaining_change: f64,
    pub income_change: f64,
    pub expenses_change: f64,
    pub income: i64,
    pub expenses: i64,
    pub remaining: i64,
    pub categories: Vec<CategorySummary>,
    pub days: Vec<DailyBucket>,
}
