use google_sheets4::api::ValueRange;
use serde_json::Value;

use crate::domain::{cell_value::CellValue, sheets::sheet_payload::SheetPayload};

pub trait ValueRangeFactory {
    fn from_rows(rows: &[Vec<CellValue>]) -> Self;
    fn from_payload(payload: &SheetPayload) -> Self;
}

fn wrap_row(row: &[CellValue]) -> Vec<Value> {
    row.iter().map(CellValue::to_json).collect()
}

impl ValueRangeFactory for ValueRange {
    fn from_rows(rows: &[Vec<CellValue>]) -> Self {
        Self {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(rows.iter().map(|row| wrap_row(row)).collect()),
        }
    }

    fn from_payload(payload: &SheetPayload) -> Self {
        Self::from_rows(payload.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result_set::ResultSet;
    use serde_json::json;

    #[test]
    fn test_from_payload() {
        let payload = SheetPayload::from_result_set(ResultSet::new(
            vec!["SKU".to_string(), "PLURTL".to_string(), "MIXDESC".to_string()],
            vec![vec![
                CellValue::text("1001"),
                CellValue::from_numeric_text("6.99"),
                CellValue::Null,
            ]],
        ))
        .unwrap();

        let value_range = ValueRange::from_payload(&payload);

        assert_eq!(
            value_range.major_dimension,
            Some("ROWS".to_string()),
            "Major dimension should be ROWS"
        );
        assert_eq!(value_range.range, None, "Range should be None");
        assert_eq!(
            value_range.values,
            Some(vec![
                vec![json!("SKU"), json!("PLURTL"), json!("MIXDESC")],
                vec![json!("1001"), json!(6.99), json!("")],
            ]),
            "Text stays text, numbers stay numbers and nulls become empty cells"
        );
    }

    #[test]
    fn test_from_rows_empty() {
        let value_range = ValueRange::from_rows(&[]);
        assert_eq!(value_range.values, Some(vec![]));
    }
}
