//! Turns mapped spreadsheet rows into storage-ready transactions.
//!
//! Rows are validated one by one. Invalid rows are reported and left out,
//! then the survivors are deduplicated on `(date, amount)` keeping the first
//! occurrence.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::mapping::ImportRow;
use crate::amounts::parse_display_amount;
use crate::constants::IMPORT_DATE_FORMAT;
use crate::errors::FieldError;
use crate::transactions::NewTransaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledRow {
    pub row_index: usize,
    pub date: NaiveDate,
    pub amount: i64,
    pub payee: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    pub row_index: usize,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub accepted: Vec<ReconciledRow>,
    pub rejected: Vec<RejectedRow>,
    /// Row indices dropped as duplicates of an earlier row.
    pub duplicates: Vec<usize>,
}

impl ReconcileReport {
    /// Targets every accepted row at `account_id`.
    pub fn to_new_transactions(&self, account_id: &str) -> Vec<NewTransaction> {
        self.accepted
            .iter()
            .map(|row| NewTransaction {
                financial_account_id: account_id.to_string(),
                category_id: None,
                amount: row.amount,
                date: row.date,
                payee: row.payee.clone(),
                notes: row.notes.clone(),
            })
            .collect()
    }
}

/// Parses a date cell with `format`.
///
/// Formats without a time component are accepted as plain dates.
pub fn parse_import_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, format)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, format))
        .ok()
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn validate_row(row: &ImportRow, date_format: &str) -> Result<ReconciledRow, Vec<FieldError>> {
    let mut errors = Vec::new();

    let amount = match non_blank(row.amount.as_ref()) {
        None => {
            errors.push(FieldError::new("amount", "Amount is required"));
            None
        }
        Some(raw) => match parse_display_amount(raw) {
            Ok(amount) => Some(amount),
            Err(_) => {
                errors.push(FieldError::new("amount", "Amount must be a number"));
                None
            }
        },
    };

    let date = match non_blank(row.date.as_ref()) {
        None => {
            errors.push(FieldError::new("date", "Date is required"));
            None
        }
        Some(raw) => {
            let parsed = parse_import_date(raw, date_format);
            if parsed.is_none() {
                errors.push(FieldError::new("date", "Invalid date"));
            }
            parsed
        }
    };

    let payee = non_blank(row.payee.as_ref());
    if payee.is_none() {
        errors.push(FieldError::new("payee", "Payee is required"));
    }

    match (amount, date, payee) {
        (Some(amount), Some(date), Some(payee)) => Ok(ReconciledRow {
            row_index: row.row_index,
            date,
            amount,
            payee: payee.to_string(),
            notes: non_blank(row.notes.as_ref()).map(String::from),
        }),
        _ => Err(errors),
    }
}

/// Validates and deduplicates mapped rows.
///
/// `date_format` defaults to the `%Y-%m-%d %H:%M:%S` import pattern.
pub fn reconcile(rows: &[ImportRow], date_format: Option<&str>) -> ReconcileReport {
    let format = date_format
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(IMPORT_DATE_FORMAT);
    let mut report = ReconcileReport::default();
    let mut seen: HashSet<(NaiveDate, i64)> = HashSet::new();

    for row in rows {
        match validate_row(row, format) {
            Ok(valid) => {
                if seen.insert((valid.date, valid.amount)) {
                    report.accepted.push(valid);
                } else {
                    report.duplicates.push(valid.row_index);
                }
            }
            Err(errors) => report.rejected.push(RejectedRow {
                row_index: row.row_index,
                errors,
            }),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, date: &str, payee: &str, amount: &str) -> ImportRow {
        ImportRow {
            row_index: index,
            date: Some(date.to_string()),
            payee: Some(payee.to_string()),
            amount: Some(amount.to_string()),
            notes: None,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn accepts_valid_rows_in_storage_units() {
        let report = reconcile(&[row(0, "2024-06-01 10:00:00", "Cafe", "-4.50")], None);
        assert_eq!(report.accepted.len(), 1);
        let accepted = &report.accepted[0];
        assert_eq!(accepted.amount, -4_500);
        assert_eq!(accepted.date, d(2024, 6, 1));
        assert_eq!(accepted.payee, "Cafe");
    }

    #[test]
    fn duplicates_on_date_and_amount_keep_the_first() {
        let rows = vec![
            row(0, "2024-06-01 10:00:00", "Cafe", "-4.50"),
            row(1, "2024-06-01 18:30:00", "Other shop", "-4.5"),
            row(2, "2024-06-02 10:00:00", "Cafe", "-4.50"),
        ];
        let report = reconcile(&rows, None);
        let kept: Vec<usize> = report.accepted.iter().map(|r| r.row_index).collect();
        assert_eq!(kept, vec![0, 2]);
        assert_eq!(report.duplicates, vec![1]);
    }

    #[test]
    fn invalid_rows_are_reported_and_excluded() {
        let rows = vec![
            row(0, "2024-06-01 10:00:00", "Cafe", "abc"),
            row(1, "01/06/2024", "Cafe", "3"),
            row(2, "2024-06-01 10:00:00", " ", "3"),
            row(3, "2024-06-03 10:00:00", "Bakery", "7.25"),
        ];
        let report = reconcile(&rows, None);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].row_index, 3);

        let rejected: Vec<(usize, Option<String>)> = report
            .rejected
            .iter()
            .map(|r| (r.row_index, r.errors[0].field.clone()))
            .collect();
        assert_eq!(
            rejected,
            vec![
                (0, Some("amount".to_string())),
                (1, Some("date".to_string())),
                (2, Some("payee".to_string())),
            ]
        );
        assert_eq!(report.rejected[0].errors[0].message, "Amount must be a number");
    }

    #[test]
    fn missing_required_cells_collect_every_message() {
        let rows = vec![ImportRow {
            row_index: 4,
            notes: Some("only notes".into()),
            ..Default::default()
        }];
        let report = reconcile(&rows, None);
        assert_eq!(report.rejected[0].errors.len(), 3);
    }

    #[test]
    fn custom_date_format_accepts_plain_dates() {
        let report = reconcile(&[row(0, "01/06/2024", "Cafe", "3")], Some("%d/%m/%Y"));
        assert_eq!(report.accepted[0].date, d(2024, 6, 1));
    }

    #[test]
    fn blank_notes_are_dropped_and_rows_target_one_account() {
        let mut with_notes = row(0, "2024-06-01 10:00:00", "Cafe", "1");
        with_notes.notes = Some("  ".into());
        let report = reconcile(&[with_notes], None);
        let txs = report.to_new_transactions("acc-1");
        assert_eq!(txs[0].notes, None);
        assert_eq!(txs[0].financial_account_id, "acc-1");
        assert_eq!(txs[0].category_id, None);
    }
}
