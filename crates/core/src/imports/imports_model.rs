use serde::{Deserialize, Serialize};

use super::csv_parser::CsvGrid;
use super::mapping::{ColumnMapping, ImportField};
use super::reconciler::{ReconcileReport, RejectedRow};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreviewRequest {
    pub grid: CsvGrid,
    #[serde(default)]
    pub mapping: ColumnMapping,
    #[serde(default)]
    pub date_format: Option<String>,
}

/// Mapping progress and, once the mapping is complete, the reconcile outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub mapped_columns: usize,
    pub missing_fields: Vec<ImportField>,
    pub complete: bool,
    pub report: Option<ReconcileReport>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub account_id: String,
    pub grid: CsvGrid,
    pub mapping: ColumnMapping,
    #[serde(default)]
    pub date_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub inserted: usize,
    pub rejected: Vec<RejectedRow>,
    pub duplicates: Vec<usize>,
}

/// Uploaded receipt image.
#[derive(Debug, Clone)]
pub struct ReceiptImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Best-effort fields read off a receipt; each may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptFields {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub payee: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn pick(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    preferred
        .filter(|v| !v.trim().is_empty())
        .or(fallback.filter(|v| !v.trim().is_empty()))
}

impl ReceiptFields {
    /// Required fields the scan did not produce.
    pub fn missing_required(&self) -> Vec<ImportField> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.amount) {
            missing.push(ImportField::Amount);
        }
        if blank(&self.date) {
            missing.push(ImportField::Date);
        }
        if blank(&self.payee) {
            missing.push(ImportField::Payee);
        }
        missing
    }

    /// Non-blank values in `overrides` replace the scanned ones.
    pub fn merged_with(self, overrides: ReceiptFields) -> ReceiptFields {
        ReceiptFields {
            amount: pick(overrides.amount, self.amount),
            date: pick(overrides.date, self.date),
            payee: pick(overrides.payee, self.payee),
            notes: pick(overrides.notes, self.notes),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptScan {
    #[serde(flatten)]
    pub fields: ReceiptFields,
    pub missing_fields: Vec<ImportField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptImportRequest {
    pub account_id: String,
    #[serde(default)]
    pub scanned: ReceiptFields,
    #[serde(default)]
    pub overrides: ReceiptFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_non_blank_values() {
        let scanned = ReceiptFields {
            amount: Some("12.40".into()),
            date: None,
            payee: Some("Corner Shop".into()),
            notes: Some("milk".into()),
        };
        let overrides = ReceiptFields {
            amount: Some(" ".into()),
            date: Some("2024-06-01".into()),
            payee: Some("Corner Store".into()),
            notes: None,
        };
        let merged = scanned.merged_with(overrides);
        assert_eq!(merged.amount.as_deref(), Some("12.40"));
        assert_eq!(merged.date.as_deref(), Some("2024-06-01"));
        assert_eq!(merged.payee.as_deref(), Some("Corner Store"));
        assert_eq!(merged.notes.as_deref(), Some("milk"));
        assert!(merged.missing_required().is_empty());
    }

    #[test]
    fn missing_required_lists_blank_fields() {
        let fields = ReceiptFields {
            payee: Some("".into()),
            ..Default::default()
        };
        assert_eq!(
            fields.missing_required(),
            vec![ImportField::Amount, ImportField::Date, ImportField::Payee]
        );
    }
}
