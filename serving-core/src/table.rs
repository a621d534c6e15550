//! Rectangular table assembled from JSON row-objects.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::scalar::Scalar;

/// Errors raised while assembling rows into a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("row {row}, column '{column}': expected a scalar value, found {found}")]
    NonScalarCell {
        row: usize,
        column: String,
        found: &'static str,
    },
}

/// Column-labelled rows of scalars.
///
/// Columns are the union of keys across all rows, in the order each key is
/// first seen. A key missing from a row is a `Null` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl Table {
    /// Build a table from an ordered sequence of row-objects.
    pub fn from_rows(rows: &[Map<String, Value>]) -> Result<Self, TableError> {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut cells = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let mut out = Vec::with_capacity(columns.len());
            for column in &columns {
                let cell = match row.get(column) {
                    None => Scalar::Null,
                    Some(value) => {
                        Scalar::from_json(value).ok_or_else(|| TableError::NonScalarCell {
                            row: row_idx,
                            column: column.clone(),
                            found: json_kind(value),
                        })?
                    }
                };
                out.push(cell);
            }
            cells.push(out);
        }

        Ok(Self {
            columns,
            rows: cells,
        })
    }

    /// Build a table directly from columns and rows.
    ///
    /// Rows shorter than the column list are padded with `Null`; longer rows
    /// are truncated.
    #[cfg(test)]
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Scalar::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
