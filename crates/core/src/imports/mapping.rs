//! One-to-one assignment of spreadsheet columns to transaction fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::csv_parser::CsvGrid;
use crate::errors::{Error, Result};

const COLUMN_KEY_PREFIX: &str = "column_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportField {
    Date,
    Payee,
    Amount,
    Notes,
    /// Clears the column's assignment.
    Skip,
}

impl ImportField {
    /// Fields every import must map before it can run.
    pub const REQUIRED: [ImportField; 3] = [ImportField::Amount, ImportField::Date, ImportField::Payee];
}

/// Column index to field assignments; each field is held by at most one column.
///
/// Serialized as `{"column_0": "date", "column_3": "amount"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Option<ImportField>>",
    into = "BTreeMap<String, Option<ImportField>>"
)]
pub struct ColumnMapping {
    columns: BTreeMap<usize, ImportField>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `field` to `column`, releasing it from any column that held it.
    /// `Skip` unassigns the column.
    pub fn assign(&mut self, column: usize, field: ImportField) {
        if field == ImportField::Skip {
            self.columns.remove(&column);
            return;
        }
        self.columns.retain(|_, held| *held != field);
        self.columns.insert(column, field);
    }

    pub fn field_for(&self, column: usize) -> Option<ImportField> {
        self.columns.get(&column).copied()
    }

    pub fn column_for(&self, field: ImportField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(_, held)| **held == field)
            .map(|(column, _)| *column)
    }

    /// Number of mapped columns.
    pub fn progress(&self) -> usize {
        self.columns.len()
    }

    pub fn missing_required(&self) -> Vec<ImportField> {
        ImportField::REQUIRED
            .into_iter()
            .filter(|field| self.column_for(*field).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Rejects a mapping that cannot be imported against `grid`.
    pub fn ensure_usable(&self, grid: &CsvGrid) -> Result<()> {
        if let Some((column, _)) = self
            .columns
            .iter()
            .find(|(column, _)| **column >= grid.headers.len())
        {
            return Err(Error::invalid(format!(
                "Column {} does not exist in the uploaded file",
                column
            )));
        }
        let missing = self.missing_required();
        if !missing.is_empty() {
            let names: Vec<String> = missing
                .iter()
                .map(|f| format!("{:?}", f).to_lowercase())
                .collect();
            return Err(Error::invalid(format!(
                "Map the required fields before importing: {}",
                names.join(", ")
            )));
        }
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, ImportField)> + '_ {
        self.columns.iter().map(|(c, f)| (*c, *f))
    }
}

impl TryFrom<BTreeMap<String, Option<ImportField>>> for ColumnMapping {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Option<ImportField>>) -> std::result::Result<Self, String> {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, field) in raw {
            let column = key
                .strip_prefix(COLUMN_KEY_PREFIX)
                .and_then(|index| index.parse::<usize>().ok())
                .ok_or_else(|| format!("invalid column key '{}'", key))?;
            entries.push((column, field.unwrap_or(ImportField::Skip)));
        }
        entries.sort_by_key(|(column, _)| *column);

        let mut mapping = ColumnMapping::new();
        for (column, field) in entries {
            mapping.assign(column, field);
        }
        Ok(mapping)
    }
}

impl From<ColumnMapping> for BTreeMap<String, Option<ImportField>> {
    fn from(mapping: ColumnMapping) -> Self {
        mapping
            .columns
            .into_iter()
            .map(|(column, field)| (format!("{}{}", COLUMN_KEY_PREFIX, column), Some(field)))
            .collect()
    }
}

/// A data row reduced to its mapped fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    /// Position among the grid's data rows.
    pub row_index: usize,
    pub date: Option<String>,
    pub payee: Option<String>,
    pub amount: Option<String>,
    pub notes: Option<String>,
}

impl ImportRow {
    fn set(&mut self, field: ImportField, value: String) {
        match field {
            ImportField::Date => self.date = Some(value),
            ImportField::Payee => self.payee = Some(value),
            ImportField::Amount => self.amount = Some(value),
            ImportField::Notes => self.notes = Some(value),
            ImportField::Skip => {}
        }
    }
}

/// Projects every data row through the mapping, dropping rows whose mapped
/// cells are all missing or blank.
pub fn apply_mapping(rows: &[Vec<String>], mapping: &ColumnMapping) -> Vec<ImportRow> {
    rows.iter()
        .enumerate()
        .filter_map(|(row_index, cells)| {
            let mut row = ImportRow {
                row_index,
                ..Default::default()
            };
            let mut has_value = false;
            for (column, field) in mapping.iter() {
                if let Some(cell) = cells.get(column) {
                    has_value |= !cell.trim().is_empty();
                    row.set(field, cell.clone());
                }
            }
            has_value.then_some(row)
        })
        .collect()
}
