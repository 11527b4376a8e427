use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use fintrack_core::{
    imports::{
        CsvParseOptions, ImportPreview, ImportPreviewRequest, ImportRequest, ImportResult,
        ParsedCsv, ReceiptImage, ReceiptImportRequest, ReceiptScan,
    },
    transactions::Transaction,
    users::AuthenticatedUser,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

struct Upload {
    file: Option<ReceiptImage>,
    delimiter: Option<String>,
}

/// Reads the `file` part and an optional `delimiter` text part.
async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    let mut upload = Upload {
        file: None,
        delimiter: None,
    };
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
                upload.file = Some(ReceiptImage {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
            Some("delimiter") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
                upload.delimiter = Some(text);
            }
            _ => {}
        }
    }
    Ok(upload)
}

fn require_file(upload: Upload) -> ApiResult<(ReceiptImage, Option<String>)> {
    match upload.file {
        Some(file) if !file.bytes.is_empty() => Ok((file, upload.delimiter)),
        _ => Err(ApiError::BadRequest("A file is required".to_string())),
    }
}

async fn parse_csv(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> ApiResult<Json<ParsedCsv>> {
    let (file, delimiter) = require_file(read_upload(multipart).await?)?;
    let options = CsvParseOptions { delimiter };
    let parsed = state
        .import_service
        .parse_csv(&user.id, &file.bytes, &options)?;
    Ok(Json(parsed))
}

async fn preview_import(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ImportPreviewRequest>,
) -> ApiResult<Json<ImportPreview>> {
    Ok(Json(state.import_service.preview(&user.id, request)?))
}

async fn import_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ImportRequest>,
) -> ApiResult<Json<ImportResult>> {
    let result = state
        .import_service
        .import_transactions(&user.id, request)
        .await?;
    tracing::info!(
        "Imported {} transactions for user {} ({} rejected, {} duplicates)",
        result.inserted,
        user.id,
        result.rejected.len(),
        result.duplicates.len()
    );
    Ok(Json(result))
}

async fn scan_receipt(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> ApiResult<Json<ReceiptScan>> {
    let (image, _) = require_file(read_upload(multipart).await?)?;
    let scan = state.import_service.scan_receipt(&user.id, image).await?;
    Ok(Json(scan))
}

async fn import_receipt(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ReceiptImportRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state
        .import_service
        .import_receipt(&user.id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/imports", post(import_transactions))
        .route("/imports/csv/parse", post(parse_csv))
        .route("/imports/preview", post(preview_import))
        .route("/imports/receipt/scan", post(scan_receipt))
        .route("/imports/receipt", post(import_receipt))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
