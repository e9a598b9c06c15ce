use std::{fmt::Debug, path::Path};

use error_stack::{report, ResultExt};
use google_sheets4::oauth2;
use thiserror::Error;
use tracing::instrument;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential file could not be read")]
    Unreadable,
    #[error("Credential file is not a valid service account key")]
    Malformed,
    #[error("Credential field '{0}' is empty")]
    MissingField(&'static str),
}

/// The parts of a Google service account key this job needs.
#[derive(serde::Deserialize, Clone)]
pub struct ServiceAccountCredential {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountCredential {
    #[instrument(name = "ServiceAccountCredential::load")]
    pub async fn load(path: &Path) -> error_stack::Result<Self, CredentialError> {
        let bytes = tokio::fs::read(path)
            .await
            .change_context(CredentialError::Unreadable)
            .attach_printable_lazy(|| format!("Credential path: {}", path.display()))?;

        Self::from_json(&bytes)
            .attach_printable_lazy(|| format!("Credential path: {}", path.display()))
    }

    pub fn from_json(bytes: &[u8]) -> error_stack::Result<Self, CredentialError> {
        let credential: Self =
            serde_json::from_slice(bytes).change_context(CredentialError::Malformed)?;

        if credential.client_email.trim().is_empty() {
            return Err(report!(CredentialError::MissingField("client_email")));
        }
        if credential.private_key.trim().is_empty() {
            return Err(report!(CredentialError::MissingField("private_key")));
        }

        Ok(credential)
    }

    pub fn into_service_account_key(
        self,
    ) -> error_stack::Result<oauth2::ServiceAccountKey, CredentialError> {
        serde_json::from_value(serde_json::json!({
            "type": "service_account",
            "client_email": self.client_email,
            "private_key": self.private_key,
            "token_uri": self.token_uri,
        }))
        .change_context(CredentialError::Malformed)
    }
}
