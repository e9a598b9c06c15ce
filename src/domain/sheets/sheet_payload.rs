use error_stack::report;
use thiserror::Error;

use crate::domain::{cell_value::CellValue, result_set::ResultSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Row {row} has {found} values but the header has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rows written to the sheet: row 0 is the header, the rest are the data rows in
/// result-set order. Every row has the header's width.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPayload {
    rows: Vec<Vec<CellValue>>,
}

impl SheetPayload {
    /// Builds the payload from a result set. An empty result set yields a header-only payload.
    pub fn from_result_set(result_set: ResultSet) -> error_stack::Result<Self, PayloadError> {
        let ResultSet { columns, rows } = result_set;
        let expected = columns.len();

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(report!(PayloadError::RaggedRow {
                row: index + 1,
                expected,
                found: row.len(),
            }));
        }

        let header = columns.into_iter().map(CellValue::Text).collect();

        let mut payload = Vec::with_capacity(rows.len() + 1);
        payload.push(header);
        payload.extend(rows);

        Ok(Self { rows: payload })
    }

    pub fn header(&self) -> &[CellValue] {
        &self.rows[0]
    }

    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        &self.rows[1..]
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.header().len()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len() - 1
    }

    #[cfg(test)]
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }
}
