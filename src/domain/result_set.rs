use super::{cell_value::CellValue, date::cymd_to_mdy};

/// Materialized query result. `columns` is the projection order reported by the result-set
/// metadata, so it is known even when `rows` is empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Rewrites `YYYYMMDD` values in the named columns as `MM/DD/YYYY`. Column names match
    /// case-insensitively; unknown names are ignored and values that are not 8-digit dates
    /// are left as they are.
    pub fn reformat_cymd_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name.as_ref()))
            .collect();

        if indices.is_empty() {
            return;
        }

        for row in self.rows.iter_mut() {
            for &index in &indices {
                let Some(cell) = row.get_mut(index) else {
                    continue;
                };

                let raw = match cell {
                    CellValue::Text(text) => text.trim().to_owned(),
                    CellValue::Number(number) => number.to_string(),
                    CellValue::Null => continue,
                };

                if let Some(formatted) = cymd_to_mdy(&raw) {
                    *cell = CellValue::Text(formatted);
                }
            }
        }
    }
}
