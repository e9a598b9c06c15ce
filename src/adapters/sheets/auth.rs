use std::sync::Arc;

use error_stack::ResultExt;
use google_sheets4::hyper;
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use tracing::instrument;

use crate::adapters::sheets::{
    credential::ServiceAccountCredential,
    http_client::HttpsConnector,
    spreadsheet_manager::SpreadsheetManager,
};
use crate::config::sheets_config::SpreadsheetConfig;
use crate::ports::sheet_sink::{SheetAuthorizer, SheetError, SheetSink};

/// Read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

pub type SheetsAuthenticator = Authenticator<HttpsConnector>;

/// Builds a service account authenticator and fetches one token so a rejected key fails here
/// rather than on the first sheet call.
#[instrument(skip(client))]
pub async fn auth(
    credential: ServiceAccountCredential,
    client: hyper::Client<HttpsConnector>,
) -> error_stack::Result<SheetsAuthenticator, SheetError> {
    let client_email = credential.client_email.clone();
    let secret = credential
        .into_service_account_key()
        .change_context(SheetError::CredentialLoad)?;

    let authenticator = oauth2::ServiceAccountAuthenticator::with_client(secret, client)
        .build()
        .await
        .change_context(SheetError::Authorization)
        .attach_printable("Could not create an authenticator")?;

    authenticator
        .token(&[SPREADSHEETS_SCOPE])
        .await
        .change_context(SheetError::Authorization)
        .attach_printable_lazy(|| {
            format!("Token request rejected for service account {}", client_email)
        })?;

    tracing::debug!("Authorized as {}", client_email);
    Ok(authenticator)
}

/// Authorizes against Google with the configured service account key.
#[derive(Debug, Clone)]
pub struct ServiceAccountAuthorizer {
    config: SpreadsheetConfig,
}

impl ServiceAccountAuthorizer {
    pub fn new(config: SpreadsheetConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SheetAuthorizer for ServiceAccountAuthorizer {
    async fn authorize(&self) -> error_stack::Result<Arc<dyn SheetSink>, SheetError> {
        let manager = SpreadsheetManager::connect(self.config.clone()).await?;
        Ok(Arc::new(manager))
    }
}
