use std::path::PathBuf;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Plain-text copy of the log, recreated on every run.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// `None` when `level` is not one of trace, debug, info, warn or error.
    pub fn parsed_level(&self) -> Option<tracing::Level> {
        self.level.trim().parse().ok()
    }
}
