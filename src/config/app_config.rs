use config::Config;
use error_stack::{report, ResultExt};
use thiserror::Error;

use super::{
    database_config::DatabaseConfig, logging_config::LoggingConfig,
    sheets_config::SpreadsheetConfig,
};

/// Environment variables with this prefix override file values, e.g.
/// `PROMO_SYNC__SHEETS__SHEET_NAME=Promos`.
pub const ENV_PREFIX: &str = "PROMO_SYNC";
const ENV_SEPARATOR: &str = "__";

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: SpreadsheetConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{0}'")]
    Load(String),
    #[error("Invalid configuration field '{path}'")]
    Invalid { path: String },
}

fn environment_overlay() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .list_separator(",")
        .with_list_parse_key("database.cymd_columns")
}

fn invalid(path: &str, reason: &str) -> error_stack::Report<ConfigError> {
    report!(ConfigError::Invalid {
        path: path.to_string()
    })
    .attach_printable(reason.to_string())
}

impl AppConfig {
    /// Reads `config_path` (any format the `config` crate understands, extension optional) and
    /// layers `PROMO_SYNC__*` environment variables on top.
    pub fn load(config_path: &str) -> error_stack::Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name(config_path))
            .add_source(environment_overlay())
            .build()
            .change_context_lazy(|| ConfigError::Load(config_path.to_string()))?;

        Self::from_config(config)
            .attach_printable_lazy(|| format!("Config file: {}", config_path))
    }

    /// Deserializes an already built [`Config`], reporting the path of the first bad field.
    /// Values stay strings until a field asks for a number, so a numeric-looking sheet name or
    /// password is read as text.
    pub fn from_config(config: Config) -> error_stack::Result<Self, ConfigError> {
        let app_config: AppConfig = serde_path_to_error::deserialize(config).map_err(|err| {
            let path = err.path().to_string();
            report!(ConfigError::Invalid { path }).attach_printable(err.into_inner().to_string())
        })?;

        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> error_stack::Result<(), ConfigError> {
        if self.sheets.spreadsheet_id.trim().is_empty() {
            return Err(invalid("sheets.spreadsheet_id", "must not be blank"));
        }
        if self.sheets.sheet_name.trim().is_empty() {
            return Err(invalid("sheets.sheet_name", "must not be blank"));
        }
        if self.database.connection_string.trim().is_empty() {
            return Err(invalid("database.connection_string", "must not be blank"));
        }
        if self.database.query.trim().is_empty() {
            return Err(invalid("database.query", "must not be blank"));
        }
        if self.database.batch_size == 0 {
            return Err(invalid("database.batch_size", "must be greater than zero"));
        }
        if self.database.max_text_len == 0 {
            return Err(invalid("database.max_text_len", "must be greater than zero"));
        }
        if self.logging.parsed_level().is_none() {
            return Err(invalid(
                "logging.level",
                "expected one of trace, debug, info, warn, error",
            ));
        }
        Ok(())
    }
}
