use async_trait::async_trait;

use super::csv_parser::{CsvParseOptions, ParsedCsv};
use super::imports_model::{
    ImportPreview, ImportPreviewRequest, ImportRequest, ImportResult, ReceiptFields,
    ReceiptImage, ReceiptImportRequest, ReceiptScan,
};
use crate::errors::Result;
use crate::transactions::Transaction;

/// OCR collaborator that reads transaction fields off a receipt image.
#[async_trait]
pub trait ReceiptScannerTrait: Send + Sync {
    async fn scan(&self, image: ReceiptImage) -> Result<ReceiptFields>;
}

/// Spreadsheet and receipt imports. Every operation requires premium.
#[async_trait]
pub trait ImportServiceTrait: Send + Sync {
    fn parse_csv(
        &self,
        user_id: &str,
        content: &[u8],
        options: &CsvParseOptions,
    ) -> Result<ParsedCsv>;

    fn preview(&self, user_id: &str, request: ImportPreviewRequest) -> Result<ImportPreview>;

    /// Reconciles the grid and inserts the surviving rows in one write.
    async fn import_transactions(&self, user_id: &str, request: ImportRequest)
        -> Result<ImportResult>;

    async fn scan_receipt(&self, user_id: &str, image: ReceiptImage) -> Result<ReceiptScan>;

    async fn import_receipt(
        &self,
        user_id: &str,
        request: ReceiptImportRequest,
    ) -> Result<Transaction>;
}
