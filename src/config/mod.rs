pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, OcrConfig, PdfConfig};
pub use loader::load_config;
