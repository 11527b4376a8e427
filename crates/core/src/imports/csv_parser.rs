//! Spreadsheet upload parsing.
//!
//! Turns raw CSV bytes into the header + rows grid the reconciler maps.
//! Delimiter is auto-detected unless given.

use csv::{ReaderBuilder, Terminator};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::Result;

const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];
const DETECTION_SAMPLE_LINES: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvParseOptions {
    /// Explicit delimiter; `None` or `"auto"` detects one.
    pub delimiter: Option<String>,
}

impl CsvParseOptions {
    fn explicit_delimiter(&self) -> Option<u8> {
        match self.delimiter.as_deref() {
            None | Some("") | Some("auto") => None,
            Some("\\t") | Some("\t") => Some(b'\t'),
            Some(other) => other.bytes().next(),
        }
    }
}

/// Header row plus data rows, each padded or truncated to the header width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsv {
    #[serde(flatten)]
    pub grid: CsvGrid,
    pub delimiter: String,
    pub errors: Vec<CsvIssue>,
}

/// Non-fatal problem found while reading the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvIssue {
    pub row_index: Option<usize>,
    pub message: String,
}

impl CsvIssue {
    fn at_row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row_index: Some(row),
            message: message.into(),
        }
    }
}

pub fn parse_csv(content: &[u8], options: &CsvParseOptions) -> Result<ParsedCsv> {
    let mut errors = Vec::new();
    let text = decode_content(content, &mut errors);
    let delimiter = options
        .explicit_delimiter()
        .unwrap_or_else(|| detect_delimiter(&text));

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Vec<String> = record
                    .iter()
                    .map(|cell| cell.trim_end_matches('\r').to_string())
                    .collect();
                if !row.iter().all(|cell| cell.trim().is_empty()) {
                    records.push(row);
                }
            }
            Err(e) => errors.push(CsvIssue::at_row(
                idx,
                format!("Failed to parse row {}: {}", idx + 1, e),
            )),
        }
    }

    let mut records = records.into_iter();
    let headers: Vec<String> = match records.next() {
        Some(header) => header.iter().map(|h| h.trim().to_string()).collect(),
        None => {
            return Err(Error::invalid(
                "CSV file is empty or contains no valid records",
            ))
        }
    };

    let width = headers.len();
    let rows = records
        .enumerate()
        .map(|(idx, mut row)| {
            if row.len() > width {
                errors.push(CsvIssue::at_row(
                    idx,
                    format!(
                        "Row {} has {} columns, expected {}. Extra columns ignored.",
                        idx + 1,
                        row.len(),
                        width
                    ),
                ));
                row.truncate(width);
            } else {
                row.resize(width, String::new());
            }
            row
        })
        .collect();

    Ok(ParsedCsv {
        grid: CsvGrid { headers, rows },
        delimiter: (delimiter as char).to_string(),
        errors,
    })
}

/// Strips a UTF-8 BOM and falls back to lossy decoding.
fn decode_content(content: &[u8], errors: &mut Vec<CsvIssue>) -> String {
    let body = content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content);
    match std::str::from_utf8(body) {
        Ok(s) => s.to_string(),
        Err(e) => {
            errors.push(CsvIssue {
                row_index: None,
                message: format!(
                    "Invalid UTF-8 encoding at byte {}. Some characters may be replaced.",
                    e.valid_up_to()
                ),
            });
            String::from_utf8_lossy(body).into_owned()
        }
    }
}

/// Picks the candidate that splits the first lines most consistently.
fn detect_delimiter(content: &str) -> u8 {
    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(DETECTION_SAMPLE_LINES)
        .collect();

    CANDIDATE_DELIMITERS
        .iter()
        .map(|&candidate| {
            let counts: Vec<usize> = lines.iter().map(|l| l.matches(candidate).count()).collect();
            let first = counts.first().copied().unwrap_or(0);
            let consistent = counts.iter().filter(|&&c| c == first).count();
            (candidate, first * consistent)
        })
        .filter(|(_, score)| *score > 0)
        .max_by_key(|(_, score)| *score)
        .map(|(candidate, _)| candidate as u8)
        .unwrap_or(b',')
}
