use std::path::PathBuf;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SpreadsheetConfig {
    pub spreadsheet_id: Box<str>,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: Box<str>,
    /// Service account key exported from the Google Cloud console.
    #[serde(default = "default_credential_path")]
    pub credential_path: PathBuf,
}

fn default_sheet_name() -> Box<str> {
    "Sheet1".into()
}

fn default_credential_path() -> PathBuf {
    PathBuf::from("service.json")
}
