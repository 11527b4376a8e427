//! Imports module - spreadsheet uploads, column mapping, reconciliation and
//! receipt scans.

mod csv_parser;
mod imports_model;
mod imports_service;
mod imports_traits;
mod mapping;
mod reconciler;

#[cfg(test)]
mod imports_service_tests;

pub use csv_parser::{parse_csv, CsvGrid, CsvIssue, CsvParseOptions, ParsedCsv};
pub use imports_model::{
    ImportPreview, ImportPreviewRequest, ImportRequest, ImportResult, ReceiptFields,
    ReceiptImage, ReceiptImportRequest, ReceiptScan,
};
pub use imports_service::ImportService;
pub use imports_traits::{ImportServiceTrait, ReceiptScannerTrait};
pub use mapping::{apply_mapping, ColumnMapping, ImportField, ImportRow};
pub use reconciler::{
    parse_import_date, reconcile, ReconcileReport, ReconciledRow, RejectedRow,
};
