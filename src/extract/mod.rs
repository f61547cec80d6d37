pub mod csv;
pub mod ocr;
pub mod pdf;

use thiserror::Error;

pub use csv::parse_csv;
pub use ocr::{with_engine, OcrEngineFactory, TesseractFactory};
pub use pdf::PdfRenderer;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input is not valid UTF-8 text")]
    Unreadable,
    #[error("input contains no data")]
    Empty,
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
