use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::csv_parser::{parse_csv, CsvParseOptions, ParsedCsv};
use super::imports_model::{
    ImportPreview, ImportPreviewRequest, ImportRequest, ImportResult, ReceiptImage,
    ReceiptImportRequest, ReceiptScan,
};
use super::imports_traits::{ImportServiceTrait, ReceiptScannerTrait};
use super::mapping::{apply_mapping, ImportField, ImportRow};
use super::reconciler::reconcile;
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::constants::DATE_FORMAT;
use crate::errors::{Error, FieldError, Result, ValidationError};
use crate::premium::PremiumServiceTrait;
use crate::transactions::{NewTransaction, Transaction, TransactionRepositoryTrait};

pub struct ImportService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    premium_service: Arc<dyn PremiumServiceTrait>,
    receipt_scanner: Arc<dyn ReceiptScannerTrait>,
}

impl ImportService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        premium_service: Arc<dyn PremiumServiceTrait>,
        receipt_scanner: Arc<dyn ReceiptScannerTrait>,
    ) -> Self {
        Self {
            account_repository,
            transaction_repository,
            premium_service,
            receipt_scanner,
        }
    }

    fn resolve_account(&self, user_id: &str, account_id: &str) -> Result<Account> {
        if account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::Fields(vec![
                FieldError::new("accountId", "Account is required"),
            ])));
        }
        self.account_repository
            .get_by_id(user_id, account_id.trim())?
            .ok_or_else(|| Error::NotFound("Account not found".to_string()))
    }
}

fn missing_field_message(field: ImportField) -> FieldError {
    match field {
        ImportField::Amount => FieldError::new("amount", "Please enter an amount."),
        ImportField::Date => FieldError::new("date", "Please enter a date."),
        ImportField::Payee => FieldError::new("payee", "Please enter a payee."),
        ImportField::Notes | ImportField::Skip => FieldError::new("notes", "Invalid field"),
    }
}

#[async_trait]
impl ImportServiceTrait for ImportService {
    fn parse_csv(
        &self,
        user_id: &str,
        content: &[u8],
        options: &CsvParseOptions,
    ) -> Result<ParsedCsv> {
        self.premium_service.ensure_premium(user_id)?;
        let parsed = parse_csv(content, options)?;
        debug!(
            "Parsed upload for user {}: {} columns, {} rows, {} issues",
            user_id,
            parsed.grid.headers.len(),
            parsed.grid.rows.len(),
            parsed.errors.len()
        );
        Ok(parsed)
    }

    fn preview(&self, user_id: &str, request: ImportPreviewRequest) -> Result<ImportPreview> {
        self.premium_service.ensure_premium(user_id)?;
        let missing_fields = request.mapping.missing_required();
        let complete = missing_fields.is_empty();
        let report = complete.then(|| {
            let rows = apply_mapping(&request.grid.rows, &request.mapping);
            reconcile(&rows, request.date_format.as_deref())
        });
        Ok(ImportPreview {
            mapped_columns: request.mapping.progress(),
            missing_fields,
            complete,
            report,
        })
    }

    async fn import_transactions(
        &self,
        user_id: &str,
        request: ImportRequest,
    ) -> Result<ImportResult> {
        self.premium_service.ensure_premium(user_id)?;
        let account = self.resolve_account(user_id, &request.account_id)?;
        request.mapping.ensure_usable(&request.grid)?;

        let rows = apply_mapping(&request.grid.rows, &request.mapping);
        let report = reconcile(&rows, request.date_format.as_deref());
        let new_transactions = report.to_new_transactions(&account.id);

        let inserted = if new_transactions.is_empty() {
            0
        } else {
            self.transaction_repository
                .create_many(new_transactions)
                .await?
        };
        info!(
            "Imported {} transactions into account {} ({} rejected, {} duplicates)",
            inserted,
            account.id,
            report.rejected.len(),
            report.duplicates.len()
        );

        Ok(ImportResult {
            inserted,
            rejected: report.rejected,
            duplicates: report.duplicates,
        })
    }

    async fn scan_receipt(&self, user_id: &str, image: ReceiptImage) -> Result<ReceiptScan> {
        self.premium_service.ensure_premium(user_id)?;
        if image.bytes.is_empty() {
            return Err(Error::invalid("Receipt image is empty"));
        }
        debug!("Scanning receipt '{}' for user {}", image.filename, user_id);
        let fields = self.receipt_scanner.scan(image).await?;
        Ok(ReceiptScan {
            missing_fields: fields.missing_required(),
            fields,
        })
    }

    async fn import_receipt(
        &self,
        user_id: &str,
        request: ReceiptImportRequest,
    ) -> Result<Transaction> {
        self.premium_service.ensure_premium(user_id)?;
        let account = self.resolve_account(user_id, &request.account_id)?;

        let fields = request.scanned.merged_with(request.overrides);
        let missing = fields.missing_required();
        if !missing.is_empty() {
            return Err(Error::Validation(ValidationError::Fields(
                missing.into_iter().map(missing_field_message).collect(),
            )));
        }

        let row = ImportRow {
            row_index: 0,
            date: fields.date,
            payee: fields.payee,
            amount: fields.amount,
            notes: fields.notes,
        };
        let report = reconcile(&[row], Some(DATE_FORMAT));
        if let Some(rejected) = report.rejected.into_iter().next() {
            return Err(Error::Validation(ValidationError::Fields(rejected.errors)));
        }

        let accepted = report.accepted.into_iter().next().ok_or_else(|| {
            Error::Unexpected("Receipt row was neither accepted nor rejected".to_string())
        })?;
        self.transaction_repository
            .create(NewTransaction {
                financial_account_id: account.id,
                category_id: None,
                amount: accepted.amount,
                date: accepted.date,
                payee: accepted.payee,
                notes: accepted.notes,
            })
            .await
    }
}
