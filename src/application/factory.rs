use std::sync::Arc;

use crate::adapters::{odbc::odbc_record_source::OdbcRecordSource, sheets::auth::ServiceAccountAuthorizer};
use crate::application::promo_sheet_sync::PromoSheetSync;
use crate::config::AppConfig;

pub struct PromoSheetSyncFactory;

impl PromoSheetSyncFactory {
    /// Wires the Google service account authorizer and the ODBC source from configuration.
    pub fn create(config: &AppConfig) -> PromoSheetSync {
        PromoSheetSync::new(
            config.sheets.sheet_name.to_string(),
            Arc::new(ServiceAccountAuthorizer::new(config.sheets.clone())),
            Arc::new(OdbcRecordSource::new(config.database.clone())),
        )
    }
}
