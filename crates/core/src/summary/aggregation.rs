//! Pure aggregation steps over a user's transactions.
//!
//! Sums are carried in `i128` and narrowed back to storage units at the end,
//! so a total that does not fit is reported instead of wrapping.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::colors::CategoryColorAssigner;
use super::summary_model::{CategorySummary, DailyBucket, PeriodTotals};
use crate::constants::{OTHER_CATEGORY_NAME, TOP_CATEGORY_COUNT, UNKNOWN_CATEGORY_NAME};
use crate::errors::{Error, Result};
use crate::transactions::Transaction;
use crate::utils::Period;

/// Key used for the color of transactions without a category.
const UNCATEGORIZED_KEY: &str = "uncategorized";

fn to_units(sum: i128) -> Result<i64> {
    i64::try_from(sum).map_err(|_| Error::invalid("Amount total is out of range"))
}

/// Percentage change from `previous` to `current`.
///
/// Growth from zero is reported as a flat 100 whatever the new value is, and
/// zero to zero is 0.
pub fn percentage_change(previous: i64, current: i64) -> f64 {
    if previous == 0 {
        return if current == 0 { 0.0 } else { 100.0 };
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// Sums the transactions dated inside `period`.
pub fn period_totals(transactions: &[Transaction], period: &Period) -> Result<PeriodTotals> {
    let (income, expenses) = transactions
        .iter()
        .filter(|t| period.contains(t.date))
        .fold((0i128, 0i128), |(income, expenses), t| {
            if t.amount >= 0 {
                (income + i128::from(t.amount), expenses)
            } else {
                (income, expenses + i128::from(t.amount))
            }
        });
    Ok(PeriodTotals {
        income: to_units(income)?,
        expenses: to_units(expenses)?,
        remaining: to_units(income + expenses)?,
    })
}

/// Top categories by absolute summed value plus an "Other" rollup.
///
/// Only transactions with a strictly positive amount inside `period` take
/// part. `category_names` maps category ids to display names; ids missing
/// from it render as "Unknown".
pub fn category_breakdown(
    transactions: &[Transaction],
    period: &Period,
    category_names: &HashMap<String, String>,
) -> Result<Vec<CategorySummary>> {
    let mut sums: BTreeMap<Option<&str>, i128> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| period.contains(t.date) && t.amount > 0)
    {
        *sums.entry(t.category_id.as_deref()).or_default() += i128::from(t.amount);
    }

    let mut groups: Vec<(Option<&str>, String, i128)> = sums
        .into_iter()
        .map(|(key, sum)| {
            let name = key
                .and_then(|id| category_names.get(id))
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string());
            (key, name, sum.abs())
        })
        .collect();
    groups.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut colors = CategoryColorAssigner::new();
    let mut result = Vec::with_capacity(TOP_CATEGORY_COUNT + 1);
    for (key, name, value) in groups.iter().take(TOP_CATEGORY_COUNT) {
        result.push(CategorySummary {
            name: name.clone(),
            value: to_units(*value)?,
            color: colors.assign(key.unwrap_or(UNCATEGORIZED_KEY)),
        });
    }

    if groups.len() > TOP_CATEGORY_COUNT {
        let rest: i128 = groups[TOP_CATEGORY_COUNT..].iter().map(|g| g.2).sum();
        result.push(CategorySummary {
            name: OTHER_CATEGORY_NAME.to_string(),
            value: to_units(rest)?,
            color: CategoryColorAssigner::other().to_string(),
        });
    }
    Ok(result)
}

/// One bucket per calendar day of `period`, ascending, with zeroes for days
/// without activity.
pub fn daily_series(transactions: &[Transaction], period: &Period) -> Result<Vec<DailyBucket>> {
    let mut active: HashMap<NaiveDate, (i128, i128)> = HashMap::new();
    for t in transactions.iter().filter(|t| period.contains(t.date)) {
        let day = active.entry(t.date).or_default();
        if t.amount >= 0 {
            day.0 += i128::from(t.amount);
        } else {
            day.1 += i128::from(t.amount);
        }
    }

    period
        .days()
        .into_iter()
        .map(|date| {
            let (income, expenses) = active.get(&date).copied().unwrap_or_default();
            Ok(DailyBucket {
                date,
                income: to_units(income)?,
                expenses: to_units(-expenses)?,
            })
        })
        .collect()
}
