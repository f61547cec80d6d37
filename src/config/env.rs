use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: String,
    pub intake: IntakeConfig,
    pub ocr: OcrConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    /// Defaults to `<data_dir>/inbox`.
    pub inbox_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub poll_interval: Duration,
    pub skip_process_guard: bool,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub command: String,
    pub lang: String,
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub command: String,
    pub dpi: u32,
    pub max_pages: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
