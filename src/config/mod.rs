pub mod app_config;
pub mod database_config;
pub mod logging_config;
pub mod sheets_config;

pub use app_config::{AppConfig, ConfigError};
