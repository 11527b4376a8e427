#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::imports::*;
    use crate::premium::PremiumService;
    use crate::testing::InMemoryStore;
    use crate::unconfigured::Unconfigured;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct FixedScanner(ReceiptFields);

    #[async_trait]
    impl ReceiptScannerTrait for FixedScanner {
        async fn scan(&self, _image: ReceiptImage) -> crate::Result<ReceiptFields> {
            Ok(self.0.clone())
        }
    }

    fn setup_with_scanner(
        scanner: Arc<dyn ReceiptScannerTrait>,
    ) -> (ImportService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        let premium = Arc::new(PremiumService::new(
            store.clone(),
            Arc::new(Unconfigured::new("Payment gateway")),
            9,
        ));
        let service = ImportService::new(store.clone(), store.clone(), premium, scanner);
        (service, store)
    }

    fn setup() -> (ImportService, Arc<InMemoryStore>) {
        setup_with_scanner(Arc::new(Unconfigured::new("Receipt scanner")))
    }

    fn grid() -> CsvGrid {
        let csv = "Date,Description,Amount,Memo\n\
                   2024-06-01 09:00:00,Cafe,-4.50,latte\n\
                   2024-06-01 17:00:00,Cafe again,-4.5,\n\
                   bad date,Shop,3,\n\
                   2024-06-02 10:00:00,Salary,2500,\n";
        parse_csv(csv.as_bytes(), &CsvParseOptions::default())
            .unwrap()
            .grid
    }

    fn full_mapping() -> ColumnMapping {
        let mut mapping = ColumnMapping::new();
        mapping.assign(0, ImportField::Date);
        mapping.assign(1, ImportField::Payee);
        mapping.assign(2, ImportField::Amount);
        mapping.assign(3, ImportField::Notes);
        mapping
    }

    #[tokio::test]
    async fn import_inserts_valid_rows_and_reports_the_rest() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let account = store.add_account("u1", "Checking", None);

        let result = service
            .import_transactions(
                "u1",
                ImportRequest {
                    account_id: account.id.clone(),
                    grid: grid(),
                    mapping: full_mapping(),
                    date_format: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.inserted, 2);
        assert_eq!(result.duplicates, vec![1]);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].row_index, 2);

        let stored = store.transactions_of(&account.id);
        let amounts: Vec<i64> = stored.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![-4_500, 2_500_000]);
        assert_eq!(stored[0].notes.as_deref(), Some("latte"));
        assert_eq!(stored[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[tokio::test]
    async fn import_requires_premium() {
        let (service, store) = setup();
        let account = store.add_account("u1", "Checking", None);
        let err = service
            .import_transactions(
                "u1",
                ImportRequest {
                    account_id: account.id,
                    grid: grid(),
                    mapping: full_mapping(),
                    date_format: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(err.to_string(), "Please upgrade to premium to use this feature");
        assert!(store.transactions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_into_foreign_account_inserts_nothing() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let theirs = store.add_account("u2", "Savings", None);
        let err = service
            .import_transactions(
                "u1",
                ImportRequest {
                    account_id: theirs.id,
                    grid: grid(),
                    mapping: full_mapping(),
                    date_format: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.transactions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn incomplete_mapping_blocks_import_but_previews() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let account = store.add_account("u1", "Checking", None);
        let mut partial = ColumnMapping::new();
        partial.assign(0, ImportField::Date);

        let preview = service
            .preview(
                "u1",
                ImportPreviewRequest {
                    grid: grid(),
                    mapping: partial.clone(),
                    date_format: None,
                },
            )
            .unwrap();
        assert!(!preview.complete);
        assert_eq!(preview.mapped_columns, 1);
        assert_eq!(
            preview.missing_fields,
            vec![ImportField::Amount, ImportField::Payee]
        );
        assert!(preview.report.is_none());

        let err = service
            .import_transactions(
                "u1",
                ImportRequest {
                    account_id: account.id,
                    grid: grid(),
                    mapping: partial,
                    date_format: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn complete_preview_carries_reconcile_report() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let preview = service
            .preview(
                "u1",
                ImportPreviewRequest {
                    grid: grid(),
                    mapping: full_mapping(),
                    date_format: None,
                },
            )
            .unwrap();
        let report = preview.report.unwrap();
        assert_eq!(report.accepted.len(), 2);
        assert!(store.transactions.lock().unwrap().is_empty());
    }

    #[test]
    fn parse_csv_is_premium_gated() {
        let (service, store) = setup();
        let options = CsvParseOptions::default();
        assert!(service.parse_csv("u1", b"a,b\n1,2\n", &options).is_err());
        store.grant_premium("u1");
        let parsed = service.parse_csv("u1", b"a,b\n1,2\n", &options).unwrap();
        assert_eq!(parsed.grid.rows.len(), 1);
    }

    #[tokio::test]
    async fn receipt_scan_reports_missing_fields() {
        let scanner = FixedScanner(ReceiptFields {
            amount: Some("12.40".into()),
            payee: Some("Corner Shop".into()),
            ..Default::default()
        });
        let (service, store) = setup_with_scanner(Arc::new(scanner));
        store.grant_premium("u1");

        let scan = service
            .scan_receipt(
                "u1",
                ReceiptImage {
                    bytes: vec![0xFF, 0xD8],
                    filename: "receipt.jpg".into(),
                    content_type: Some("image/jpeg".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(scan.missing_fields, vec![ImportField::Date]);
        assert_eq!(scan.fields.payee.as_deref(), Some("Corner Shop"));
    }

    #[tokio::test]
    async fn receipt_import_applies_overrides_and_creates_one_transaction() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let account = store.add_account("u1", "Checking", None);

        let missing = service
            .import_receipt(
                "u1",
                ReceiptImportRequest {
                    account_id: account.id.clone(),
                    scanned: ReceiptFields {
                        amount: Some("12.40".into()),
                        ..Default::default()
                    },
                    overrides: ReceiptFields::default(),
                },
            )
            .await
            .unwrap_err();
        let messages: Vec<String> = missing
            .field_errors()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["Please enter a date.", "Please enter a payee."]);

        let created = service
            .import_receipt(
                "u1",
                ReceiptImportRequest {
                    account_id: account.id.clone(),
                    scanned: ReceiptFields {
                        amount: Some("12.40".into()),
                        payee: Some("Corner Shop".into()),
                        ..Default::default()
                    },
                    overrides: ReceiptFields {
                        date: Some("2024-06-03".into()),
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();
        assert_eq!(created.amount, 12_400);
        assert_eq!(created.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(store.transactions_of(&account.id).len(), 1);
    }

    #[tokio::test]
    async fn receipt_with_unparseable_amount_is_rejected() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let account = store.add_account("u1", "Checking", None);
        let err = service
            .import_receipt(
                "u1",
                ReceiptImportRequest {
                    account_id: account.id,
                    scanned: ReceiptFields {
                        amount: Some("twelve".into()),
                        date: Some("2024-06-03".into()),
                        payee: Some("Shop".into()),
                        notes: None,
                    },
                    overrides: ReceiptFields::default(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.field_errors()[0].field.as_deref(), Some("amount"));
    }

    #[tokio::test]
    async fn unconfigured_scanner_is_an_external_dependency_error() {
        let (service, store) = setup();
        store.grant_premium("u1");
        let err = service
            .scan_receipt(
                "u1",
                ReceiptImage {
                    bytes: vec![1],
                    filename: "r.png".into(),
                    content_type: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalDependency);
    }
}
