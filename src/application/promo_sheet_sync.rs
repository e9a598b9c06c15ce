use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, Utc};
use error_stack::{report, Report, ResultExt};
use thiserror::Error;
use tracing::instrument;

use crate::domain::{
    pipeline_state::PipelineState,
    sheets::sheet_payload::SheetPayload,
};
use crate::ports::{
    record_source::RecordSource,
    sheet_sink::{AppendOutcome, SheetAuthorizer},
};

pub const ROUTINE_NAME: &str = "PromoSheetSync";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Spreadsheet authorization failed")]
    Authorization,
    #[error("Failed to clear sheet '{0}'")]
    Clear(String),
    #[error("Failed to extract promotion records")]
    Extract,
    #[error("Extracted records could not be shaped into sheet rows")]
    Payload,
    #[error("Failed to append rows to sheet '{0}'")]
    Append(String),
    #[error("Sheet '{0}' was not found in the spreadsheet")]
    SheetNotFound(String),
    #[error("Pipeline stepped out of order")]
    InvalidTransition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub data_rows: usize,
    pub columns: usize,
    pub updated_range: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows x {} columns written to {} at {}",
            self.data_rows,
            self.columns,
            self.updated_range.as_deref().unwrap_or("<unknown range>"),
            self.finished_at.to_rfc3339()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub sheet_name: String,
    pub sheet_id: i32,
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "🟢 Authorized, sheet '{}' found (id {}), database reachable",
            self.sheet_name, self.sheet_id
        )
    }
}

/// Replaces the contents of one sheet with the result of the promotion query:
/// authorize, clear, extract, write. Runs once; a second `run` on the same instance is
/// rejected because the pipeline is already in a terminal state.
pub struct PromoSheetSync {
    sheet_name: String,
    authorizer: Arc<dyn SheetAuthorizer>,
    source: Arc<dyn RecordSource>,
    state: PipelineState,
}

impl Debug for PromoSheetSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromoSheetSync")
            .field("sheet_name", &self.sheet_name)
            .field("state", &self.state)
            .finish()
    }
}

impl PromoSheetSync {
    pub fn new<S: Into<String>>(
        sheet_name: S,
        authorizer: Arc<dyn SheetAuthorizer>,
        source: Arc<dyn RecordSource>,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            authorizer,
            source,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) -> error_stack::Result<(), SyncError> {
        self.state = self
            .state
            .transition_to(next)
            .change_context(SyncError::InvalidTransition)?;
        tracing::debug!("{} -> {}", ROUTINE_NAME, next);
        Ok(())
    }

    fn fail(&mut self, report: Report<SyncError>) -> Report<SyncError> {
        let failed_in = self.state;
        if failed_in.can_transition_to(PipelineState::Failed) {
            self.state = PipelineState::Failed;
        }
        report.attach_printable(format!("Pipeline state when failing: {}", failed_in))
    }

    fn left_empty_note(&self) -> String {
        format!(
            "Sheet '{}' was already cleared and is left empty; rerun the job to restore it",
            self.sheet_name
        )
    }

    #[instrument(skip(self), fields(sheet = %self.sheet_name))]
    pub async fn run(&mut self) -> error_stack::Result<SyncReport, SyncError> {
        match self.run_steps().await {
            Ok(report) => Ok(report),
            Err(report) => Err(self.fail(report)),
        }
    }

    async fn run_steps(&mut self) -> error_stack::Result<SyncReport, SyncError> {
        self.advance(PipelineState::Authorizing)?;
        let sink = self
            .authorizer
            .authorize()
            .await
            .change_context(SyncError::Authorization)?;

        self.advance(PipelineState::Clearing)?;
        sink.clear_sheet(&self.sheet_name)
            .await
            .change_context_lazy(|| SyncError::Clear(self.sheet_name.clone()))?;

        self.advance(PipelineState::Extracting)?;
        let result_set = self
            .source
            .fetch_records()
            .await
            .change_context(SyncError::Extract)
            .attach_printable_lazy(|| self.left_empty_note())?;
        let payload = SheetPayload::from_result_set(result_set)
            .change_context(SyncError::Payload)
            .attach_printable_lazy(|| self.left_empty_note())?;

        self.advance(PipelineState::Writing)?;
        let AppendOutcome { updated_range, .. } = sink
            .append_rows(&self.sheet_name, &payload)
            .await
            .change_context_lazy(|| SyncError::Append(self.sheet_name.clone()))
            .attach_printable_lazy(|| self.left_empty_note())?;

        self.advance(PipelineState::Done)?;
        Ok(SyncReport {
            data_rows: payload.data_row_count(),
            columns: payload.width(),
            updated_range,
            finished_at: Utc::now(),
        })
    }

    /// Authorizes, confirms the target tab exists and that the database accepts a connection.
    /// Nothing is written.
    #[instrument(skip(self), fields(sheet = %self.sheet_name))]
    pub async fn check(&self) -> error_stack::Result<CheckReport, SyncError> {
        let sink = self
            .authorizer
            .authorize()
            .await
            .change_context(SyncError::Authorization)?;

        let sheet_id = sink
            .sheet_id(&self.sheet_name)
            .await
            .change_context_lazy(|| SyncError::SheetNotFound(self.sheet_name.clone()))?
            .ok_or_else(|| report!(SyncError::SheetNotFound(self.sheet_name.clone())))?;

        self.source
            .ping()
            .await
            .change_context(SyncError::Extract)?;

        Ok(CheckReport {
            sheet_name: self.sheet_name.clone(),
            sheet_id,
        })
    }

    /// Extracts and shapes the rows without authorizing or touching the sheet.
    #[instrument(skip(self))]
    pub async fn preview(&self) -> error_stack::Result<SheetPayload, SyncError> {
        let result_set = self
            .source
            .fetch_records()
            .await
            .change_context(SyncError::Extract)?;
        SheetPayload::from_result_set(result_set).change_context(SyncError::Payload)
    }
}
