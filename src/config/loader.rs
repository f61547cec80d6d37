use std::{env, str::FromStr, time::Duration};

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, IntakeConfig, LoggingConfig, OcrConfig, PdfConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            inbox_dir: env::var("INBOX_DIR").ok().filter(|v| !v.is_empty()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone = env::var("REPORT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        let intake = IntakeConfig {
            poll_interval: Duration::from_millis(parse_or("POLL_INTERVAL_MS", 2_000)?),
            skip_process_guard: env::var("SKIP_PROCESS_GUARD")
                .map(|v| v.eq_ignore_ascii_case("1") || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };

        let ocr = OcrConfig {
            command: env::var("OCR_COMMAND").unwrap_or_else(|_| "tesseract".to_string()),
            lang: env::var("OCR_LANG").unwrap_or_else(|_| "eng".to_string()),
        };

        let pdf = PdfConfig {
            command: env::var("PDF_RENDER_COMMAND").unwrap_or_else(|_| "pdftoppm".to_string()),
            dpi: parse_or("PDF_RENDER_DPI", 200)?,
            max_pages: parse_or("PDF_MAX_PAGES", 10)?,
        };

        Ok(Self {
            directories,
            logging,
            timezone,
            intake,
            ocr,
            pdf,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}
