use std::fmt::Formatter;

use serde_json::{Number, Value};

/// A single scalar coming out of the database, as it will be stored in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Number(Number),
}

impl CellValue {
    pub fn text<S: Into<String>>(text: S) -> Self {
        CellValue::Text(text.into())
    }

    /// Parses driver text for a numeric column. Integers stay integers, anything else that
    /// parses as a finite float becomes a float, and text that is not a number is kept as text.
    ///
    /// # Examples
    /// ```
    /// use promo_sheet_sync::domain::CellValue;
    /// assert_eq!(CellValue::from_numeric_text(" 42 ").to_string(), "42");
    /// assert_eq!(CellValue::from_numeric_text("12.50").to_string(), "12.5");
    /// assert_eq!(CellValue::from_numeric_text("n/a"), CellValue::text("n/a"));
    /// ```
    pub fn from_numeric_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(integer) = trimmed.parse::<i64>() {
            return CellValue::Number(Number::from(integer));
        }

        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::text(text))
    }

    /// JSON value sent to the Sheets API. Nulls are sent as empty strings so a RAW write
    /// always produces an empty cell instead of skipping the position.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::String(String::new()),
            CellValue::Text(text) => Value::String(text.clone()),
            CellValue::Number(number) => Value::Number(number.clone()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::text(text)
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::Text(text)
    }
}

impl From<i64> for CellValue {
    fn from(number: i64) -> Self {
        CellValue::Number(Number::from(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_integer() {
        assert_eq!(CellValue::from_numeric_text("5096"), CellValue::from(5096));
    }

    #[test]
    fn test_numeric_text_decimal() {
        let value = CellValue::from_numeric_text("3.99");
        assert_eq!(value.to_json(), serde_json::json!(3.99));
    }

    #[test]
    fn test_numeric_text_not_a_number_keeps_original_text() {
        assert_eq!(CellValue::from_numeric_text(" abc "), CellValue::text(" abc "));
    }

    #[test]
    fn test_numeric_text_infinity_is_text() {
        // f64 parses "inf" but JSON cannot carry it
        assert_eq!(CellValue::from_numeric_text("inf"), CellValue::text("inf"));
    }

    #[test]
    fn test_null_is_sent_as_empty_string() {
        assert_eq!(CellValue::Null.to_json(), Value::String(String::new()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::text("SKU").to_string(), "SKU");
        assert_eq!(CellValue::from(7).to_string(), "7");
    }
}
