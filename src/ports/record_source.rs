use thiserror::Error;

use crate::domain::result_set::ResultSet;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Failed to connect to the database")]
    DatabaseConnection,
    #[error("Failed to execute the extraction query")]
    QueryExecution,
}

#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Runs the extraction query and returns every row. The underlying connection is
    /// released before this returns, whether or not the query succeeded.
    async fn fetch_records(&self) -> error_stack::Result<ResultSet, ExtractError>;

    /// Opens and closes a connection without running the query.
    async fn ping(&self) -> error_stack::Result<(), ExtractError>;
}
