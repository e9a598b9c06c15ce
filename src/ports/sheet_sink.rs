use std::sync::Arc;

use thiserror::Error;

use crate::domain::sheets::sheet_payload::SheetPayload;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Failed to load the service account credential")]
    CredentialLoad,
    #[error("Spreadsheet authorization was rejected")]
    Authorization,
    #[error("Failed to clear sheet")]
    Clear,
    #[error("Failed to append rows")]
    Append,
    #[error("Failed to look up sheet")]
    Lookup,
}

/// What the spreadsheet reported back after an append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    pub updated_range: Option<String>,
    pub updated_rows: Option<i32>,
    pub updated_cells: Option<i32>,
}

#[async_trait::async_trait]
pub trait SheetSink: Send + Sync {
    /// Removes every value from the sheet, keeping formatting and structure.
    async fn clear_sheet(&self, sheet_name: &str) -> error_stack::Result<(), SheetError>;

    /// Writes `payload` starting at `A1` of the sheet, with values stored as given.
    async fn append_rows(
        &self,
        sheet_name: &str,
        payload: &SheetPayload,
    ) -> error_stack::Result<AppendOutcome, SheetError>;

    /// Numeric id of the tab titled `sheet_name`, if the spreadsheet has one.
    async fn sheet_id(&self, sheet_name: &str) -> error_stack::Result<Option<i32>, SheetError>;
}

#[async_trait::async_trait]
pub trait SheetAuthorizer: Send + Sync {
    /// Performs the authorization handshake and hands back a client ready for writes.
    async fn authorize(&self) -> error_stack::Result<Arc<dyn SheetSink>, SheetError>;
}
