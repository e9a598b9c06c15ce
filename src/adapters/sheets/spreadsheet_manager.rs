use std::fmt::Debug;

use error_stack::ResultExt;
use google_sheets4::{
    api::{ClearValuesRequest, ValueRange},
    Sheets,
};
use tracing::instrument;

use crate::adapters::sheets::{
    auth,
    credential::ServiceAccountCredential,
    http_client::{self, HttpsConnector},
    value_range_factory::ValueRangeFactory,
};
use crate::config::sheets_config::SpreadsheetConfig;
use crate::domain::sheets::{
    a1_notation::{whole_sheet, CellPosition, ToA1Notation},
    sheet_payload::SheetPayload,
};
use crate::ports::sheet_sink::{AppendOutcome, SheetError, SheetSink};

/// Values are stored as given, never parsed as formulas.
const VALUE_INPUT_OPTION: &str = "RAW";
/// Appended rows overwrite whatever is below the table instead of inserting new rows.
const INSERT_DATA_OPTION: &str = "OVERWRITE";

pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpreadsheetManager {{ config: {:?} }}", self.config)
    }
}

impl SpreadsheetManager {
    /// Loads the credential, authorizes and builds the Sheets hub.
    #[instrument(name = "SpreadsheetManager::connect")]
    pub async fn connect(config: SpreadsheetConfig) -> error_stack::Result<Self, SheetError> {
        let credential = ServiceAccountCredential::load(&config.credential_path)
            .await
            .change_context(SheetError::CredentialLoad)?;

        let client = http_client::http_client()?;
        let auth = auth::auth(credential, client.clone()).await?;
        let hub = Sheets::new(client, auth);

        Ok(SpreadsheetManager { config, hub })
    }
}

#[async_trait::async_trait]
impl SheetSink for SpreadsheetManager {
    #[instrument(skip(self))]
    async fn clear_sheet(&self, sheet_name: &str) -> error_stack::Result<(), SheetError> {
        let range = whole_sheet(sheet_name);

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_clear(
                ClearValuesRequest::default(),
                &self.config.spreadsheet_id,
                range.as_ref(),
            )
            .doit()
            .await
            .change_context(SheetError::Clear)
            .attach_printable_lazy(|| format!("Failed to clear range {}", range))?;

        tracing::info!(
            "Sheet cleared: {}",
            response.cleared_range.as_deref().unwrap_or(range.as_ref())
        );
        Ok(())
    }

    #[instrument(skip(self, payload), fields(rows = payload.rows().len(), columns = payload.width()))]
    async fn append_rows(
        &self,
        sheet_name: &str,
        payload: &SheetPayload,
    ) -> error_stack::Result<AppendOutcome, SheetError> {
        let anchor = CellPosition::ORIGIN.to_a1_notation(Some(sheet_name));
        let value_range = ValueRange::from_payload(payload);

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(value_range, &self.config.spreadsheet_id, anchor.as_ref())
            .value_input_option(VALUE_INPUT_OPTION)
            .insert_data_option(INSERT_DATA_OPTION)
            .doit()
            .await
            .change_context(SheetError::Append)
            .attach_printable_lazy(|| format!("Failed to append to range {}", anchor))?;

        let outcome = response
            .updates
            .map(|updates| AppendOutcome {
                updated_range: updates.updated_range,
                updated_rows: updates.updated_rows,
                updated_cells: updates.updated_cells,
            })
            .unwrap_or_default();

        tracing::info!(
            "Data appended: {} ({} rows, {} cells)",
            outcome.updated_range.as_deref().unwrap_or(anchor.as_ref()),
            outcome.updated_rows.unwrap_or_default(),
            outcome.updated_cells.unwrap_or_default()
        );
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn sheet_id(&self, sheet_name: &str) -> error_stack::Result<Option<i32>, SheetError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(&self.config.spreadsheet_id)
            .doit()
            .await
            .change_context(SheetError::Lookup)?;

        let sheet_id = spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties)
            .find(|properties| properties.title.as_deref() == Some(sheet_name))
            .and_then(|properties| properties.sheet_id);

        Ok(sheet_id)
    }
}
