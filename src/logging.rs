use error_stack::{report, ResultExt};
use thiserror::Error;
use tracing_subscriber::{
    filter::Targets, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

use crate::{config::logging_config::LoggingConfig, prettyprint::PrettyFormatter};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create log file")]
    LogFile,
    #[error("Invalid log level")]
    Level,
    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

const TARGET: &str = "promo_sheet_sync";

/// Installs the global subscriber: pretty output on stderr plus an optional plain log file.
/// `verbose` raises the level to DEBUG regardless of configuration.
pub fn init_tracing(
    config: &LoggingConfig,
    verbose: bool,
) -> error_stack::Result<(), LoggingError> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        config
            .parsed_level()
            .ok_or_else(|| report!(LoggingError::Level))
            .attach_printable_lazy(|| format!("Configured level: {}", config.level))?
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(std::io::stderr);

    let log_file_layer = match &config.file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .change_context(LoggingError::LogFile)
                .attach_printable_lazy(|| format!("Log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(PrettyFormatter::new(false))
                    .with_writer(file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    Registry::default()
        .with(Targets::new().with_target(TARGET, level))
        .with(log_file_layer)
        .with(stderr_layer)
        .try_init()
        .change_context(LoggingError::AlreadyInitialized)
}
