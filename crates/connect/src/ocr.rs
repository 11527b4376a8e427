//! Client for the receipt OCR endpoint.
//!
//! The endpoint takes a multipart upload with a single `file` part and answers
//! with best-effort `{amount, date, payee, notes}` strings, any of which may
//! be null.

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use fintrack_core::errors::{Error, Result};
use fintrack_core::imports::{ReceiptFields, ReceiptImage, ReceiptScannerTrait};

use crate::http::{build_client, parse_response, request_failed};

const SERVICE: &str = "OCR";

#[derive(Deserialize)]
struct OcrResponse {
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    payee: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcrClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OcrClient {
    /// `endpoint` is the full upload URL, e.g. `http://localhost:8000/ocr/`.
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl ReceiptScannerTrait for OcrClient {
    async fn scan(&self, image: ReceiptImage) -> Result<ReceiptFields> {
        debug!(
            "[OCR] Uploading {} ({} bytes)",
            image.filename,
            image.bytes.len()
        );

        let mut part = Part::bytes(image.bytes).file_name(image.filename);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| Error::invalid(format!("Invalid content type: {}", e)))?;
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(|e| request_failed(SERVICE, e))?;

        let extracted: OcrResponse = parse_response(SERVICE, response).await?;
        Ok(ReceiptFields {
            amount: extracted.amount,
            date: extracted.date,
            payee: extracted.payee,
            notes: extracted.notes,
        })
    }
}
