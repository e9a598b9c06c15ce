use error_stack::{report, ResultExt};
use odbc_api::{
    buffers::TextRowSet, Connection, ConnectionOptions, Cursor, DataType, Environment,
    ResultSetMetadata,
};
use tracing::instrument;

use crate::config::database_config::DatabaseConfig;
use crate::domain::{cell_value::CellValue, result_set::ResultSet};
use crate::ports::record_source::{ExtractError, RecordSource};

/// Reads the promotion rows over ODBC. Each call opens its own environment and connection on
/// a blocking worker and drops both before returning.
#[derive(Debug, Clone)]
pub struct OdbcRecordSource {
    config: DatabaseConfig,
}

impl OdbcRecordSource {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl RecordSource for OdbcRecordSource {
    #[instrument(skip(self), fields(dsn = %self.config.redacted_connection_string()))]
    async fn fetch_records(&self) -> error_stack::Result<ResultSet, ExtractError> {
        let config = self.config.clone();
        let mut result_set = tokio::task::spawn_blocking(move || fetch_blocking(&config))
            .await
            .change_context(ExtractError::QueryExecution)
            .attach_printable("Extraction worker did not finish")??;

        result_set.reformat_cymd_columns(&self.config.cymd_columns);

        tracing::info!(
            "Fetched {} rows with {} columns",
            result_set.row_count(),
            result_set.column_count()
        );
        Ok(result_set)
    }

    #[instrument(skip(self), fields(dsn = %self.config.redacted_connection_string()))]
    async fn ping(&self) -> error_stack::Result<(), ExtractError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let environment = environment()?;
            connect(&environment, &config).map(|_connection| ())
        })
        .await
        .change_context(ExtractError::DatabaseConnection)
        .attach_printable("Connection worker did not finish")??;

        tracing::info!("Database connection OK");
        Ok(())
    }
}

fn environment() -> error_stack::Result<Environment, ExtractError> {
    Environment::new()
        .change_context(ExtractError::DatabaseConnection)
        .attach_printable("Could not allocate an ODBC environment")
}

fn connect<'env>(
    environment: &'env Environment,
    config: &DatabaseConfig,
) -> error_stack::Result<Connection<'env>, ExtractError> {
    environment
        .connect_with_connection_string(&config.connection_string, ConnectionOptions::default())
        .change_context(ExtractError::DatabaseConnection)
        .attach_printable_lazy(|| {
            format!(
                "Connection string: {}",
                config.redacted_connection_string()
            )
        })
}

fn fetch_blocking(config: &DatabaseConfig) -> error_stack::Result<ResultSet, ExtractError> {
    let environment = environment()?;
    let connection = connect(&environment, config)?;
    read_result_set(&connection, config)
}

fn read_result_set(
    connection: &Connection<'_>,
    config: &DatabaseConfig,
) -> error_stack::Result<ResultSet, ExtractError> {
    let mut cursor = connection
        .execute(&config.query, ())
        .change_context(ExtractError::QueryExecution)?
        .ok_or_else(|| report!(ExtractError::QueryExecution))
        .attach_printable("Statement did not produce a result set")?;

    let columns = cursor
        .column_names()
        .change_context(ExtractError::QueryExecution)?
        .collect::<Result<Vec<String>, _>>()
        .change_context(ExtractError::QueryExecution)
        .attach_printable("Could not read column names")?;

    let numeric_columns = (1..=columns.len() as u16)
        .map(|column_number| cursor.col_data_type(column_number).map(is_numeric))
        .collect::<Result<Vec<bool>, _>>()
        .change_context(ExtractError::QueryExecution)
        .attach_printable("Could not read column types")?;

    let mut buffers =
        TextRowSet::for_cursor(config.batch_size, &mut cursor, Some(config.max_text_len))
            .change_context(ExtractError::QueryExecution)?;
    let mut row_set_cursor = cursor
        .bind_buffer(&mut buffers)
        .change_context(ExtractError::QueryExecution)?;

    let mut rows = Vec::new();
    while let Some(batch) = row_set_cursor
        .fetch_with_truncation_check(true)
        .map_err(|error| fetch_failed(error, rows.len(), config.max_text_len))?
    {
        for row_index in 0..batch.num_rows() {
            let row = numeric_columns
                .iter()
                .enumerate()
                .map(|(column_index, &numeric)| {
                    cell_value(batch.at(column_index, row_index), numeric)
                })
                .collect();
            rows.push(row);
        }
    }

    Ok(ResultSet::new(columns, rows))
}

/// A value longer than the text buffer fails the batch instead of being cut short.
fn fetch_failed(
    error: odbc_api::Error,
    rows_read: usize,
    max_text_len: usize,
) -> error_stack::Report<ExtractError> {
    let truncated = matches!(error, odbc_api::Error::TooLargeValueForBuffer { .. });
    let report = report!(error)
        .change_context(ExtractError::QueryExecution)
        .attach_printable(format!("Fetch failed after {} rows", rows_read));

    if truncated {
        report.attach_printable(format!(
            "A value exceeds database.max_text_len ({} bytes); raise it to read the full text",
            max_text_len
        ))
    } else {
        report
    }
}

fn is_numeric(data_type: DataType) -> bool {
    matches!(
        data_type,
        DataType::Numeric { .. }
            | DataType::Decimal { .. }
            | DataType::Integer
            | DataType::SmallInt
            | DataType::BigInt
            | DataType::TinyInt
            | DataType::Float { .. }
            | DataType::Real
            | DataType::Double
    )
}

fn cell_value(bytes: Option<&[u8]>, numeric: bool) -> CellValue {
    match bytes {
        None => CellValue::Null,
        Some(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if numeric {
                CellValue::from_numeric_text(&text)
            } else {
                CellValue::Text(text.into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_null() {
        assert_eq!(cell_value(None, true), CellValue::Null);
        assert_eq!(cell_value(None, false), CellValue::Null);
    }

    #[test]
    fn test_cell_value_numeric_column() {
        assert_eq!(cell_value(Some(b"5096"), true), CellValue::from(5096));
        assert_eq!(
            cell_value(Some(b"12.50"), true).to_json(),
            serde_json::json!(12.5)
        );
    }

    #[test]
    fn test_cell_value_text_column_keeps_padding() {
        // CHAR columns come back padded; the value is written as is
        assert_eq!(
            cell_value(Some(b"COLA 12PK   "), false),
            CellValue::text("COLA 12PK   ")
        );
        // Digits in a text column stay text
        assert_eq!(cell_value(Some(b"0001"), false), CellValue::text("0001"));
    }

    #[test]
    fn test_oversized_value_fails_fetch() {
        let error = odbc_api::Error::TooLargeValueForBuffer {
            indicator: Some(5000),
            buffer_index: 1,
        };

        let report = fetch_failed(error, 500, 4096);

        assert_eq!(report.current_context(), &ExtractError::QueryExecution);
        let message = format!("{:?}", report);
        assert!(message.contains("after 500 rows"));
        assert!(message.contains("database.max_text_len (4096 bytes)"));
    }

    #[test]
    fn test_other_fetch_errors_do_not_mention_text_len() {
        let report = fetch_failed(odbc_api::Error::FailedAllocatingEnvironment, 0, 4096);

        assert_eq!(report.current_context(), &ExtractError::QueryExecution);
        assert!(!format!("{:?}", report).contains("max_text_len"));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric(DataType::Integer));
        assert!(is_numeric(DataType::Double));
        assert!(!is_numeric(DataType::Date));
        assert!(!is_numeric(DataType::Unknown));
    }
}
